use super::auth_store::{AuthSession, LocalStorage};

/// Une vue du front et son verrou éventuel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub name: &'static str,
    pub path: &'static str,
    pub requires_auth: bool,
}

/// Décision de la garde de navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Proceed,
    Redirect(&'static str),
}

pub const LOGIN: &str = "login";
pub const HOME: &str = "home";

// Nombre max de redirections suivies par navigate()
const MAX_REDIRECTS: usize = 4;

#[derive(Debug, Clone)]
pub struct Router {
    routes: Vec<Route>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new(vec![
            Route { name: LOGIN, path: "/login", requires_auth: false },
            Route { name: HOME, path: "/", requires_auth: true },
            Route { name: "about", path: "/about", requires_auth: true },
        ])
    }
}

impl Router {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn by_name(&self, name: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.name == name)
    }

    /// Trouve la route d'une URL (query string, fragment et slash final ignorés)
    pub fn resolve(&self, url: &str) -> Option<&Route> {
        let path = url.split(['?', '#']).next().unwrap_or_default();
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        self.routes.iter().find(|r| r.path == path)
    }

    /// Garde exécutée avant chaque changement de page
    pub fn before_each<S: LocalStorage>(&self, to: &Route, session: &AuthSession<S>) -> Navigation {
        let is_logged = session.is_authenticated();

        // Route verrouillée et utilisateur non connecté
        if to.requires_auth && !is_logged {
            Navigation::Redirect(LOGIN)
        }
        // Déjà connecté et essaie d'aller sur le login
        else if to.name == LOGIN && is_logged {
            Navigation::Redirect(HOME)
        } else {
            Navigation::Proceed
        }
    }

    /// Résout l'URL puis applique la garde jusqu'à la route finale
    pub fn navigate<S: LocalStorage>(&self, url: &str, session: &AuthSession<S>) -> Option<&Route> {
        let mut route = self.resolve(url)?;

        for _ in 0..MAX_REDIRECTS {
            match self.before_each(route, session) {
                Navigation::Proceed => return Some(route),
                Navigation::Redirect(name) => {
                    tracing::debug!("Navigation to {} redirected to {}", route.path, name);
                    route = self.by_name(name)?;
                }
            }
        }

        tracing::warn!("Too many redirects while navigating to {}", url);
        None
    }
}
