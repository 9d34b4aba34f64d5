//! Route resolution with login/dashboard guards.

/// Top-level screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Dashboard => "/dashboard",
        }
    }
}

/// Resolves a requested path to the screen to show.
///
/// Empty and unknown paths redirect to login; guests are kept off the
/// dashboard and logged-in users off the login screen.
pub fn resolve_route(path: &str, is_logged_in: bool) -> Route {
    let requested = match path.trim_matches('/') {
        "dashboard" => Route::Dashboard,
        _ => Route::Login,
    };

    match requested {
        Route::Dashboard if !is_logged_in => Route::Login,
        Route::Login if is_logged_in => Route::Dashboard,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::{resolve_route, Route};

    #[test]
    fn guests_land_on_login() {
        assert_eq!(resolve_route("", false), Route::Login);
        assert_eq!(resolve_route("/dashboard", false), Route::Login);
        assert_eq!(resolve_route("/reports", false), Route::Login);
    }

    #[test]
    fn logged_in_users_land_on_dashboard() {
        assert_eq!(resolve_route("/login", true), Route::Dashboard);
        assert_eq!(resolve_route("dashboard", true), Route::Dashboard);
        assert_eq!(resolve_route("/anything", true), Route::Dashboard);
        assert_eq!(Route::Dashboard.path(), "/dashboard");
    }
}
