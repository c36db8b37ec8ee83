//! Permission labels, the authorization predicate and the canonical route table.
//!
//! Every place that needs to know which labels open which route (route
//! protection, navigation menus) reads [RouteTable::canonical]; there is no
//! other copy of the mapping.

use std::fmt::Display;

/// Permission labels issued by the backend.
pub mod labels {
    /// Full access to every management screen.
    pub const ADMINISTRADOR_DEL_SISTEMA: &str = "Administrador del Sistema";
    /// User management.
    pub const GESTION_USUARIOS: &str = "Gestion Usuarios";
    /// Permission management.
    pub const GESTION_PERMISOS: &str = "Gestion Permisos";
    /// Equipment management.
    pub const GESTION_EQUIPOS: &str = "Gestion Equipos";
    /// Organizational unit management.
    pub const GESTION_UNIDADES: &str = "Gestion Unidades";
    /// Maintenance request management.
    pub const GESTION_SOLICITUDES: &str = "Gestion Solicitudes";
    /// Maintenance history management.
    pub const GESTION_MANTENIMIENTOS: &str = "Gestion Mantenimientos";
}

use labels::*;

/// `true` iff at least one label of `required` appears in `granted`.
///
/// An empty `required` set authorizes nobody.
pub fn is_authorized<R, G>(required: &[R], granted: &[G]) -> bool
where
    R: AsRef<str>,
    G: AsRef<str>,
{
    required
        .iter()
        .any(|label| granted.iter().any(|g| g.as_ref() == label.as_ref()))
}

/// The labels any one of which opens a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionRequirement(&'static [&'static str]);

impl PermissionRequirement {
    /// Requirement satisfied by any of `labels`.
    pub const fn any_of(labels: &'static [&'static str]) -> Self {
        Self(labels)
    }

    /// The accepted labels.
    pub fn labels(&self) -> &'static [&'static str] {
        self.0
    }

    /// See [is_authorized].
    pub fn is_satisfied_by<G: AsRef<str>>(&self, granted: &[G]) -> bool {
        is_authorized(self.0, granted)
    }
}

impl Display for PermissionRequirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join(" | "))
    }
}

/// A protected navigational destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    /// Absolute path, e.g. `/equipos`.
    pub path: &'static str,
    /// Who may open it.
    pub requirement: PermissionRequirement,
    /// Title in the navigation menu; `None` keeps it out of the menu.
    pub menu_title: Option<&'static str>,
}

const CANONICAL_ROUTES: &[Route] = &[
    Route {
        path: "/usuarios",
        requirement: PermissionRequirement::any_of(&[ADMINISTRADOR_DEL_SISTEMA, GESTION_USUARIOS]),
        menu_title: Some("Gestión de Usuarios"),
    },
    Route {
        path: "/permisos",
        requirement: PermissionRequirement::any_of(&[ADMINISTRADOR_DEL_SISTEMA, GESTION_PERMISOS]),
        menu_title: Some("Gestión de Permisos"),
    },
    Route {
        path: "/equipos",
        requirement: PermissionRequirement::any_of(&[ADMINISTRADOR_DEL_SISTEMA, GESTION_EQUIPOS]),
        menu_title: Some("Gestión de Equipos"),
    },
    Route {
        path: "/unidades",
        requirement: PermissionRequirement::any_of(&[ADMINISTRADOR_DEL_SISTEMA, GESTION_UNIDADES]),
        menu_title: Some("Gestión de Unidades"),
    },
    Route {
        path: "/solicitudes",
        requirement: PermissionRequirement::any_of(&[
            ADMINISTRADOR_DEL_SISTEMA,
            GESTION_SOLICITUDES,
        ]),
        menu_title: Some("Gestión de Solicitudes"),
    },
    Route {
        path: "/perfil",
        requirement: PermissionRequirement::any_of(&[
            ADMINISTRADOR_DEL_SISTEMA,
            GESTION_USUARIOS,
            GESTION_PERMISOS,
            GESTION_EQUIPOS,
            GESTION_UNIDADES,
            GESTION_SOLICITUDES,
        ]),
        menu_title: None,
    },
    Route {
        path: "/historiales",
        requirement: PermissionRequirement::any_of(&[
            ADMINISTRADOR_DEL_SISTEMA,
            GESTION_MANTENIMIENTOS,
        ]),
        menu_title: Some("Historial de Mantenimientos"),
    },
];

/// Static mapping from route path to [PermissionRequirement].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteTable {
    routes: &'static [Route],
}

impl RouteTable {
    /// The dashboard's routes, in menu order.
    pub const fn canonical() -> Self {
        Self {
            routes: CANONICAL_ROUTES,
        }
    }

    /// A table over caller-provided routes.
    pub const fn new(routes: &'static [Route]) -> Self {
        Self { routes }
    }

    /// All routes, in table order.
    pub fn routes(&self) -> &'static [Route] {
        self.routes
    }

    /// Look up a route by exact path. A single trailing `/` is ignored.
    pub fn route(&self, path: &str) -> Option<&'static Route> {
        let path = match path.strip_suffix('/') {
            Some(stripped) if !stripped.is_empty() => stripped,
            _ => path,
        };

        self.routes.iter().find(|route| route.path == path)
    }

    /// Requirement for `path`, if the path is protected by this table.
    pub fn requirement(&self, path: &str) -> Option<PermissionRequirement> {
        self.route(path).map(|route| route.requirement)
    }

    /// Menu entries visible to a holder of `granted`, in table order.
    pub fn menu<G: AsRef<str>>(&self, granted: &[G]) -> Vec<&'static Route> {
        self.routes
            .iter()
            .filter(|route| route.menu_title.is_some())
            .filter(|route| route.requirement.is_satisfied_by(granted))
            .collect()
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::canonical()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: &[&str] = &[];

    #[test]
    fn or_semantics() {
        let required = ["A", "B"];

        assert!(is_authorized(&required, &["B"]));
        assert!(is_authorized(&required, &["C", "A"]));
        assert!(!is_authorized(&required, &["C"]));
        assert!(!is_authorized(&required, NONE));
    }

    #[test]
    fn empty_requirement_denies() {
        assert!(!is_authorized(NONE, &[ADMINISTRADOR_DEL_SISTEMA]));
        assert!(!PermissionRequirement::any_of(&[]).is_satisfied_by(&["anything"]));
    }

    #[test]
    fn labels_compare_exactly() {
        assert!(!is_authorized(&[GESTION_USUARIOS], &["Gestion"]));
        assert!(!is_authorized(&[GESTION_USUARIOS], &["gestion usuarios"]));
    }

    #[test]
    fn canonical_table() {
        let table = RouteTable::canonical();

        assert_eq!(table.routes().len(), 7);
        assert_eq!(
            table.requirement("/usuarios").unwrap().labels(),
            &[ADMINISTRADOR_DEL_SISTEMA, GESTION_USUARIOS]
        );
        assert_eq!(
            table.requirement("/historiales").unwrap().labels(),
            &[ADMINISTRADOR_DEL_SISTEMA, GESTION_MANTENIMIENTOS]
        );
        assert_eq!(table.requirement("/equipos/"), table.requirement("/equipos"));
        assert_eq!(table.requirement("/unauthorized"), None);
        assert_eq!(table.requirement("/"), None);

        for route in table.routes() {
            assert!(route.requirement.labels().contains(&ADMINISTRADOR_DEL_SISTEMA));
        }
    }

    #[test]
    fn profile_accepts_every_management_label_but_maintenance() {
        let profile = RouteTable::canonical().requirement("/perfil").unwrap();

        for label in [
            GESTION_USUARIOS,
            GESTION_PERMISOS,
            GESTION_EQUIPOS,
            GESTION_UNIDADES,
            GESTION_SOLICITUDES,
        ] {
            assert!(profile.is_satisfied_by(&[label]), "{label}");
        }
        assert!(!profile.is_satisfied_by(&[GESTION_MANTENIMIENTOS]));
    }

    #[test]
    fn menu_filtering() {
        let table = RouteTable::canonical();

        let paths: Vec<_> = table
            .menu(&[GESTION_EQUIPOS, GESTION_USUARIOS])
            .iter()
            .map(|route| route.path)
            .collect();
        assert_eq!(paths, ["/usuarios", "/equipos"]);

        let admin = table.menu(&[ADMINISTRADOR_DEL_SISTEMA]);
        assert_eq!(admin.len(), 6);
        assert!(admin.iter().all(|route| route.path != "/perfil"));

        assert!(table.menu(NONE).is_empty());
    }

    #[test]
    fn display() {
        assert_eq!(
            PermissionRequirement::any_of(&["A", "B"]).to_string(),
            "A | B"
        );
    }
}
