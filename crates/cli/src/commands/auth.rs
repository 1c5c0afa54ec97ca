//! Session commands: login, register, logout, whoami.

use scan_dine_core::Role;

use super::App;

/// Log in and verify the account holds the expected role.
///
/// When `expected` is given and the account's actual role differs, the
/// freshly stored session is discarded again and the mismatch reported, so
/// a diner cannot end up half-logged-in to the staff surface.
pub async fn login(
    app: &App,
    email: &str,
    password: &str,
    expected: Option<Role>,
) -> Result<(), Box<dyn std::error::Error>> {
    let identity = app.session.login(email, password).await?;

    if let Some(expected) = expected
        && identity.role != expected
    {
        app.session.logout();
        return Err(format!(
            "this account has the {} role, not {expected}; logged out",
            identity.role
        )
        .into());
    }

    println!("logged in as {} ({})", identity.name, identity.role);
    Ok(())
}

/// Register a new customer account; a successful registration is
/// immediately a live session.
pub async fn register(
    app: &App,
    name: &str,
    email: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let identity = app
        .session
        .register(name, email, password, Role::Customer)
        .await?;
    println!("registered and logged in as {}", identity.name);
    Ok(())
}

pub fn logout(app: &App) {
    app.session.logout();
    println!("logged out");
}

pub fn whoami(app: &App) {
    match app.session.identity() {
        Some(identity) => println!(
            "{} <{}> role={}",
            identity.name, identity.email, identity.role
        ),
        None => println!("not logged in"),
    }
}
