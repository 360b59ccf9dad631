//! Page-shell collaborator: the only thing the core needs from navigation is
//! the current route, to pick a display title.

use crate::FormKind;

pub const APP_TITLE: &str = "Site Entry Pro";

pub trait Navigator {
    fn current_route(&self) -> String;
}

/// Title shown in the page header for `route`.
pub fn page_title(route: &str) -> &'static str {
    FormKind::from_route(route).map_or(APP_TITLE, FormKind::title)
}

/// Title for whatever route `nav` currently shows.
pub fn current_title(nav: &dyn Navigator) -> &'static str {
    page_title(&nav.current_route())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct At(&'static str);

    impl Navigator for At {
        fn current_route(&self) -> String {
            self.0.to_string()
        }
    }

    #[test]
    fn known_routes() {
        assert_eq!(page_title("/induction"), "Site Induction Form");
        assert_eq!(page_title("/daily-login"), "Daily Site Log");
        assert_eq!(page_title("/materials-register"), "Materials Register Form");
    }

    #[test]
    fn unknown_route_falls_back() {
        assert_eq!(page_title("/"), APP_TITLE);
        assert_eq!(current_title(&At("/settings")), APP_TITLE);
        assert_eq!(current_title(&At("/induction")), "Site Induction Form");
    }
}
