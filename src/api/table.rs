//! Declarative route table.
//!
//! Built once from the settings. Every localized mount is registered under
//! each language prefix (`/en/...`, `/it/...`); unlocalized mounts (the
//! language switch, health) keep a bare path. The same table drives the axum
//! router, path resolution and reversing named routes.

use std::path::{Path, PathBuf};

use axum::{routing::MethodRouter, Router};
use tower_http::services::ServeDir;

use super::handlers::{admin, blog, contact, flyers, gallery, health, main, portal, schedule};
use super::locale;
use super::AppState;
use crate::config::{Settings, SiteApp};

/// One named endpoint inside an app.
#[derive(Clone)]
pub struct AppRoute {
    pub name: &'static str,
    /// Path relative to the mount prefix, Django style (`""`, `"login/"`)
    pub path: &'static str,
    handler: MethodRouter<AppState>,
}

impl AppRoute {
    pub fn new(name: &'static str, path: &'static str, handler: MethodRouter<AppState>) -> Self {
        Self {
            name,
            path,
            handler,
        }
    }
}

/// An app subtree mounted at a prefix.
#[derive(Clone)]
pub struct Mount {
    pub prefix: &'static str,
    pub app: Option<SiteApp>,
    pub namespace: Option<&'static str>,
    pub routes: Vec<AppRoute>,
}

impl Mount {
    fn new(prefix: &'static str, app: Option<SiteApp>, routes: Vec<AppRoute>) -> Self {
        Self {
            prefix,
            app,
            namespace: None,
            routes,
        }
    }

    fn namespaced(mut self, namespace: &'static str) -> Self {
        self.namespace = Some(namespace);
        self
    }

    fn qualified_name(&self, route: &AppRoute) -> String {
        match self.namespace {
            Some(ns) => format!("{}:{}", ns, route.name),
            None => route.name.to_string(),
        }
    }
}

/// Filesystem directory served under a URL prefix (development only).
#[derive(Debug, Clone)]
pub struct AssetMount {
    pub url_prefix: String,
    pub root: PathBuf,
}

/// What a path resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'a> {
    Route {
        language: Option<&'a str>,
        app: Option<SiteApp>,
        name: String,
    },
    Asset {
        root: &'a Path,
        relative: String,
    },
}

#[derive(Clone)]
pub struct RouteTable {
    languages: Vec<String>,
    unlocalized: Vec<Mount>,
    localized: Vec<Mount>,
    assets: Vec<AssetMount>,
}

impl RouteTable {
    pub fn from_settings(settings: &Settings) -> Self {
        let unlocalized = vec![
            // Language switching stays outside the localized prefix
            Mount::new("i18n/", None, locale::routes()),
            Mount::new("", None, health::routes()),
        ];

        let localized = vec![
            Mount::new("contact/", Some(SiteApp::Contact), contact::routes()),
            Mount::new("gallery/", Some(SiteApp::Gallery), gallery::routes()),
            Mount::new("admin/", Some(SiteApp::Admin), admin::routes()).namespaced("admin"),
            Mount::new("", Some(SiteApp::Main), main::routes()),
            Mount::new("schedule/", Some(SiteApp::Schedule), schedule::routes()),
            Mount::new("portal/", Some(SiteApp::Portal), portal::routes()).namespaced("portal"),
            Mount::new("blog/", Some(SiteApp::Blog), blog::routes()),
            Mount::new("flyers/", Some(SiteApp::Flyers), flyers::routes()),
        ]
        .into_iter()
        .filter(|mount| mount.app.map_or(true, |app| settings.is_installed(app)))
        .collect();

        let assets = if settings.debug {
            vec![
                AssetMount {
                    url_prefix: settings.assets.media_url.clone(),
                    root: settings.assets.media_root.clone(),
                },
                AssetMount {
                    url_prefix: settings.assets.static_url.clone(),
                    root: settings.assets.static_root.clone(),
                },
            ]
        } else {
            Vec::new()
        };

        Self {
            languages: settings.i18n.codes().map(str::to_string).collect(),
            unlocalized,
            localized,
            assets,
        }
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.languages.iter().map(String::as_str)
    }

    pub fn asset_mounts(&self) -> &[AssetMount] {
        &self.assets
    }

    /// Language of a `/xx/...` path, if `xx` is configured.
    pub fn language_prefix<'a>(&'a self, path: &str) -> Option<&'a str> {
        let first = path.strip_prefix('/')?.split('/').next()?;
        self.languages().find(|code| *code == first)
    }

    /// Every concrete path of the localized table, for one language.
    pub fn localized_paths(&self, language: &str) -> Vec<String> {
        self.localized
            .iter()
            .flat_map(|mount| {
                mount
                    .routes
                    .iter()
                    .map(move |route| localized_path(language, mount.prefix, route.path))
            })
            .collect()
    }

    /// First match wins: unlocalized, then localized, then assets.
    pub fn resolve<'a>(&'a self, path: &str) -> Option<Resolution<'a>> {
        for mount in &self.unlocalized {
            for route in &mount.routes {
                if plain_path(mount.prefix, route.path) == path {
                    return Some(Resolution::Route {
                        language: None,
                        app: mount.app,
                        name: mount.qualified_name(route),
                    });
                }
            }
        }

        if let Some(language) = self.language_prefix(path) {
            for mount in &self.localized {
                for route in &mount.routes {
                    if localized_path(language, mount.prefix, route.path) == path {
                        return Some(Resolution::Route {
                            language: Some(language),
                            app: mount.app,
                            name: mount.qualified_name(route),
                        });
                    }
                }
            }
        }

        self.assets.iter().find_map(|asset| {
            path.strip_prefix(asset.url_prefix.as_str())
                .filter(|rest| !rest.is_empty())
                .map(|rest| Resolution::Asset {
                    root: asset.root.as_path(),
                    relative: rest.to_string(),
                })
        })
    }

    /// Path of a named route (`"gallery"`, `"portal:login"`).
    pub fn reverse(&self, name: &str, language: &str) -> Option<String> {
        let find = |mounts: &[Mount]| {
            mounts.iter().find_map(|mount| {
                mount
                    .routes
                    .iter()
                    .find(|route| mount.qualified_name(route) == name)
                    .map(|route| (mount.prefix, route.path))
            })
        };

        if let Some((prefix, path)) = find(self.unlocalized.as_slice()) {
            return Some(plain_path(prefix, path));
        }
        let language = self.languages().find(|code| *code == language)?;
        find(self.localized.as_slice()).map(|(prefix, path)| localized_path(language, prefix, path))
    }

    /// Register every table entry on an axum router.
    pub fn build_router(&self) -> Router<AppState> {
        let mut router = Router::new();

        for mount in &self.unlocalized {
            for route in &mount.routes {
                router = router.route(&plain_path(mount.prefix, route.path), route.handler.clone());
            }
        }

        for language in self.languages() {
            for mount in &self.localized {
                for route in &mount.routes {
                    router = router.route(
                        &localized_path(language, mount.prefix, route.path),
                        route.handler.clone(),
                    );
                }
            }
        }

        for asset in &self.assets {
            let mount_point = asset.url_prefix.trim_end_matches('/');
            router = router.nest_service(mount_point, ServeDir::new(&asset.root));
            tracing::debug!(prefix = %mount_point, root = %asset.root.display(), "Serving local files");
        }

        router.fallback(locale::fallback)
    }
}

fn plain_path(prefix: &str, path: &str) -> String {
    format!("/{}{}", prefix, path)
}

fn localized_path(language: &str, prefix: &str, path: &str) -> String {
    format!("/{}/{}{}", language, prefix, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Env;

    fn table(pairs: &[(&str, &str)]) -> RouteTable {
        let settings = Settings::from_source(
            &Env::from_pairs(pairs.iter().copied()),
            Path::new("/srv/site"),
        )
        .unwrap();
        RouteTable::from_settings(&settings)
    }

    fn dev_table() -> RouteTable {
        table(&[("DEBUG", "true")])
    }

    #[test]
    fn test_localized_routes_exist_for_each_language() {
        let table = dev_table();
        for language in ["en", "it"] {
            let paths = table.localized_paths(language);
            for expected in ["contact/", "gallery/", "admin/", "", "schedule/", "portal/", "blog/", "flyers/"] {
                let path = format!("/{}/{}", language, expected);
                assert!(paths.contains(&path), "{} missing", path);
            }
        }
    }

    #[test]
    fn test_resolve_localized() {
        let table = dev_table();
        assert_eq!(
            table.resolve("/it/portal/login/"),
            Some(Resolution::Route {
                language: Some("it"),
                app: Some(SiteApp::Portal),
                name: "portal:login".to_string(),
            })
        );
        assert_eq!(table.resolve("/fr/blog/"), None);
        assert_eq!(table.resolve("/blog/"), None);
    }

    #[test]
    fn test_language_switch_is_unprefixed() {
        let table = dev_table();
        assert!(matches!(
            table.resolve("/i18n/setlang/"),
            Some(Resolution::Route { language: None, .. })
        ));
        assert_eq!(table.resolve("/en/i18n/setlang/"), None);
    }

    #[test]
    fn test_reverse_named_routes() {
        let table = dev_table();
        assert_eq!(table.reverse("gallery", "en").as_deref(), Some("/en/gallery/"));
        assert_eq!(table.reverse("portal:login", "it").as_deref(), Some("/it/portal/login/"));
        assert_eq!(table.reverse("home", "it").as_deref(), Some("/it/"));
        assert_eq!(table.reverse("set_language", "it").as_deref(), Some("/i18n/setlang/"));
        assert_eq!(table.reverse("login", "en"), None);
        assert_eq!(table.reverse("gallery", "de"), None);
    }

    #[test]
    fn test_assets_only_in_debug() {
        let dev = dev_table();
        assert!(matches!(
            dev.resolve("/static/js/base.js"),
            Some(Resolution::Asset { ref relative, .. }) if relative == "js/base.js"
        ));
        assert!(matches!(dev.resolve("/media/flyer.png"), Some(Resolution::Asset { .. })));

        let production = table(&[("DJANGO_SECRET_KEY", "a-production-secret-key-that-is-long-enough")]);
        assert!(production.asset_mounts().is_empty());
        assert_eq!(production.resolve("/static/js/base.js"), None);
    }

    #[test]
    fn test_disabled_schedule_is_not_mounted() {
        let table = table(&[("DEBUG", "true"), ("DISABLE_SCHEDULE", "true")]);
        assert_eq!(table.resolve("/en/schedule/"), None);
        assert!(table.resolve("/en/blog/").is_some());
    }
}
