//! Route protection.
//!
//! Each navigation is evaluated from scratch: the guard loads the session,
//! looks the path up in the [`RouteTable`] and asks the permission gate. No
//! state survives between evaluations other than what the [`SessionStore`]
//! persists.

use ceia_common::{
    constants::routes,
    permissions::{Route, RouteTable},
    session::Session,
};

use crate::{SessionStore, cross_log};

/// Outcome of evaluating a navigation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Navigation {
    /// The session may open `route`: render the wrapped view.
    Render {
        /// The matched route.
        route: &'static Route,
        /// The session that was authorized.
        session: Session,
    },
    /// Unconditional redirect (the index route).
    Redirect {
        /// Where to go instead.
        to: &'static str,
    },
    /// Denied: go to the fixed unauthorized view.
    ///
    /// Carries the requested location so a later sign-in could resume it.
    /// No detail about which labels were missing is exposed.
    Unauthorized {
        /// The originally requested location.
        from: String,
    },
}

impl Navigation {
    /// Path the UI should end up on.
    pub fn target(&self) -> &str {
        match self {
            Navigation::Render { route, .. } => route.path,
            Navigation::Redirect { to } => to,
            Navigation::Unauthorized { .. } => routes::UNAUTHORIZED,
        }
    }

    /// `true` for [`Navigation::Render`].
    pub fn is_authorized(&self) -> bool {
        matches!(self, Navigation::Render { .. })
    }
}

/// Gate in front of protected views.
#[derive(Clone, Debug)]
pub struct RouteGuard {
    sessions: SessionStore,
    table: RouteTable,
}

impl RouteGuard {
    /// Guard over the canonical route table.
    pub fn new(sessions: SessionStore) -> Self {
        Self::with_table(sessions, RouteTable::canonical())
    }

    /// Guard over a caller-provided route table.
    pub fn with_table(sessions: SessionStore, table: RouteTable) -> Self {
        Self { sessions, table }
    }

    /// The table this guard enforces.
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Decide what a navigation to `path` leads to.
    ///
    /// - `/` redirects to the default route.
    /// - Paths outside the table are unauthorized.
    /// - Without a session every protected path is unauthorized.
    pub fn evaluate(&self, path: &str) -> Navigation {
        if path == routes::INDEX || path.is_empty() {
            return Navigation::Redirect { to: routes::DEFAULT };
        }

        let Some(route) = self.table.route(path) else {
            cross_log!(debug, "Navigation to unknown route {path}");
            return Self::deny(path);
        };

        match self.sessions.load() {
            Some(session) if route.requirement.is_satisfied_by(session.permissions()) => {
                Navigation::Render { route, session }
            }
            Some(_) => {
                cross_log!(debug, "Navigation to {path} denied");
                Self::deny(path)
            }
            None => {
                cross_log!(debug, "Navigation to {path} without a session");
                Self::deny(path)
            }
        }
    }

    /// Navigation menu for the current session, in table order.
    pub fn menu(&self) -> Vec<&'static Route> {
        self.table.menu(&self.sessions.permissions())
    }

    fn deny(path: &str) -> Navigation {
        Navigation::Unauthorized {
            from: path.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ceia_common::permissions::{PermissionRequirement, labels::*};

    use super::*;
    use crate::MemoryStore;

    fn guard() -> RouteGuard {
        RouteGuard::new(SessionStore::new(Arc::new(MemoryStore::new()), "secret"))
    }

    fn sign_in(guard: &RouteGuard, permissions: &[&str]) -> Session {
        let session = Session::new(
            "abc123",
            1,
            "Ana",
            permissions.iter().map(ToString::to_string).collect(),
        )
        .unwrap();
        guard.sessions.save(&session).unwrap();
        session
    }

    #[test]
    fn index_redirects() {
        assert_eq!(
            guard().evaluate("/"),
            Navigation::Redirect { to: "/usuarios" }
        );
    }

    #[test]
    fn signed_out_is_unauthorized_everywhere() {
        let guard = guard();

        for route in guard.table().routes() {
            let navigation = guard.evaluate(route.path);

            assert_eq!(
                navigation,
                Navigation::Unauthorized {
                    from: route.path.to_string()
                }
            );
            assert_eq!(navigation.target(), "/unauthorized");
        }
    }

    #[test]
    fn renders_when_any_label_matches() {
        let guard = guard();
        let session = sign_in(&guard, &[GESTION_USUARIOS]);

        match guard.evaluate("/usuarios") {
            Navigation::Render { route, session: s } => {
                assert_eq!(route.path, "/usuarios");
                assert_eq!(s, session);
            }
            other => panic!("expected render, got {other:?}"),
        }
        assert!(guard.evaluate("/perfil").is_authorized());
        assert!(!guard.evaluate("/equipos").is_authorized());
        assert!(!guard.evaluate("/historiales").is_authorized());
    }

    #[test]
    fn administrator_opens_everything() {
        let guard = guard();
        sign_in(&guard, &[ADMINISTRADOR_DEL_SISTEMA]);

        for route in guard.table().routes() {
            assert!(guard.evaluate(route.path).is_authorized(), "{}", route.path);
        }
    }

    #[test]
    fn empty_permissions_open_nothing() {
        let guard = guard();
        sign_in(&guard, &[]);

        for route in guard.table().routes() {
            assert!(!guard.evaluate(route.path).is_authorized());
        }
        assert!(guard.menu().is_empty());
    }

    #[test]
    fn unknown_routes_are_unauthorized() {
        let guard = guard();
        sign_in(&guard, &[ADMINISTRADOR_DEL_SISTEMA]);

        assert_eq!(
            guard.evaluate("/imagenes-equipo"),
            Navigation::Unauthorized {
                from: "/imagenes-equipo".to_string()
            }
        );
    }

    #[test]
    fn empty_requirement_denies_even_signed_in() {
        static ROUTES: &[Route] = &[Route {
            path: "/abierto",
            requirement: PermissionRequirement::any_of(&[]),
            menu_title: Some("Abierto"),
        }];
        let guard = guard();
        sign_in(&guard, &[ADMINISTRADOR_DEL_SISTEMA]);
        let guard = RouteGuard::with_table(guard.sessions.clone(), RouteTable::new(ROUTES));

        assert!(!guard.evaluate("/abierto").is_authorized());
        assert!(guard.menu().is_empty());
    }

    #[test]
    fn sees_logout_immediately() {
        let guard = guard();
        sign_in(&guard, &[GESTION_EQUIPOS]);
        assert!(guard.evaluate("/equipos").is_authorized());

        guard.sessions.clear().unwrap();

        assert!(!guard.evaluate("/equipos").is_authorized());
    }

    #[test]
    fn menu_follows_the_session() {
        let guard = guard();
        sign_in(&guard, &[GESTION_MANTENIMIENTOS, GESTION_UNIDADES]);

        let paths: Vec<_> = guard.menu().iter().map(|route| route.path).collect();

        assert_eq!(paths, ["/unidades", "/historiales"]);
    }
}
