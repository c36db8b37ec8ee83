//! Command handlers.

use std::path::PathBuf;

use anyhow::Context;
use ceia_sdk::{ApiResource, Ceia, Credentials, ImageOwner, ImageUpload, Navigation};
use clap::{Subcommand, ValueEnum};
use serde_json::Value;

use crate::config::ConfigToml;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in. The password is prompted for.
    Login {
        /// E-mail address.
        #[arg(long)]
        correo: String,
    },
    /// Sign out and wipe the local namespace.
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// Show where a navigation to PATH would end up.
    Check {
        /// Route path, e.g. `/equipos`.
        path: String,
    },
    /// List the menu entries the current session may open.
    Menu,
    /// List a collection.
    List {
        /// usuarios, permisos, equipos, unidades, solicitudes or mantenimientos.
        resource: ApiResource,
    },
    /// Show one entry of a collection.
    Get { resource: ApiResource, id: i64 },
    /// Delete one entry of a collection.
    Delete { resource: ApiResource, id: i64 },
    /// List the images of an equipo or solicitud.
    Images { owner: OwnerKind, id: i64 },
    /// Upload images to an equipo or solicitud.
    Upload {
        owner: OwnerKind,
        id: i64,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print a commented sample configuration file.
    SampleConfig,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OwnerKind {
    Equipo,
    Solicitud,
}

impl OwnerKind {
    pub fn with_id(self, id: i64) -> ImageOwner {
        match self {
            OwnerKind::Equipo => ImageOwner::Equipo(id),
            OwnerKind::Solicitud => ImageOwner::Solicitud(id),
        }
    }
}

pub async fn run(ceia: &Ceia, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Login { correo } => {
            let clave = rpassword::prompt_password("Clave: ")?;
            let session = ceia.login(&Credentials::new(correo, clave)).await?;
            println!("Signed in as {} ({})", session.display_name(), session.user_id());
        }
        Command::Logout => {
            ceia.logout().await?;
            println!("Signed out");
        }
        Command::Whoami => match ceia.session() {
            Some(session) => {
                println!("{} ({})", session.display_name(), session.user_id());
                for permission in session.permissions() {
                    println!("  {permission}");
                }
            }
            None => println!("Not signed in"),
        },
        Command::Check { path } => println!("{}", describe(&ceia.guard().evaluate(&path))),
        Command::Menu => {
            for route in ceia.guard().menu() {
                println!("{:<14} {}", route.path, route.menu_title.unwrap_or_default());
            }
        }
        Command::List { resource } => {
            let entries: Vec<Value> = ceia.resource(resource).list().await?;
            print_json(&entries)?;
        }
        Command::Get { resource, id } => {
            let entry: Value = ceia.resource(resource).get(id).await?;
            print_json(&entry)?;
        }
        Command::Delete { resource, id } => {
            ceia.resource(resource).delete(id).await?;
            println!("Deleted {resource}/{id}");
        }
        Command::Images { owner, id } => {
            let images: Vec<Value> = ceia.images().list_images(owner.with_id(id)).await?;
            print_json(&images)?;
        }
        Command::Upload { owner, id, files } => {
            let uploads = files
                .iter()
                .map(|path| {
                    ImageUpload::from_path(path)
                        .with_context(|| format!("Failed to read {}", path.display()))
                })
                .collect::<anyhow::Result<Vec<_>>>()?;

            let created: Value = ceia.images().upload_images(owner.with_id(id), uploads).await?;
            print_json(&created)?;
        }
        Command::SampleConfig => println!("{}", ConfigToml::sample_string()),
    }

    Ok(())
}

/// One-line rendering of a navigation outcome.
pub fn describe(navigation: &Navigation) -> String {
    match navigation {
        Navigation::Render { route, .. } => format!("render {}", route.path),
        Navigation::Redirect { to } => format!("redirect -> {to}"),
        Navigation::Unauthorized { from } => {
            format!("unauthorized ({from}) -> {}", navigation.target())
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use ceia_sdk::RouteTable;

    use super::*;

    #[test]
    fn describes_navigations() {
        let route = RouteTable::canonical().route("/equipos").unwrap();
        let session = ceia_sdk::Session::new("t", 1, "Ana", vec![]).unwrap();

        assert_eq!(
            describe(&Navigation::Render { route, session }),
            "render /equipos"
        );
        assert_eq!(
            describe(&Navigation::Redirect { to: "/usuarios" }),
            "redirect -> /usuarios"
        );
        assert_eq!(
            describe(&Navigation::Unauthorized {
                from: "/equipos".into()
            }),
            "unauthorized (/equipos) -> /unauthorized"
        );
    }

    #[test]
    fn owner_kinds() {
        assert_eq!(OwnerKind::Equipo.with_id(3), ImageOwner::Equipo(3));
        assert_eq!(OwnerKind::Solicitud.with_id(4), ImageOwner::Solicitud(4));
    }
}
