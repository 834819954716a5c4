//! Route setup performed before the server starts.

use crate::config::{Config, RouteConfig};
use crate::http::file::FileHandler;
use crate::http::response::ResponseBuilder;
use crate::router::Router;

pub const WELCOME_PAGE: &str = "<html><body><h1>Welcome to webcore!</h1></body></html>";

/// Installs the default routes: `/`, `/index.html` and `/style.css`, all
/// served from the working directory.
pub fn setup_routes(router: &mut Router, files: FileHandler, responses: ResponseBuilder) {
    router.add_route("/", move || {
        if files.file_exists("index.html") {
            return files.serve_file("index.html", "text/html").to_bytes();
        }
        responses.make_html(WELCOME_PAGE).to_bytes()
    });

    router.add_route("/index.html", move || {
        files.serve_file("index.html", "text/html").to_bytes()
    });

    router.add_route("/style.css", move || {
        if files.file_exists("style.css") {
            return files.serve_file("style.css", "text/css").to_bytes();
        }
        responses.make_404().to_bytes()
    });
}

/// Registers one file route per entry, in order, so a repeated path keeps
/// its last entry.
pub fn register_file_routes(router: &mut Router, routes: &[RouteConfig], files: FileHandler) {
    for route in routes {
        let file = route.file.clone();
        let content_type = route.content_type.clone();

        if router.contains(&route.path) {
            tracing::warn!(path = %route.path, "Route configured twice, last entry wins");
        }

        tracing::debug!(
            path = %route.path,
            file = %file.display(),
            content_type = %content_type,
            "Registering file route"
        );
        router.add_route(route.path.clone(), move || {
            files.serve_file(&file, &content_type).to_bytes()
        });
    }
}

/// Builds the route table for `cfg`, falling back to the default routes
/// when none are configured.
pub fn build_router(cfg: &Config) -> Router {
    let responses = ResponseBuilder::new();
    let files = FileHandler::new(responses);
    let mut router = Router::new();

    if cfg.routes.is_empty() {
        setup_routes(&mut router, files, responses);
    } else {
        register_file_routes(&mut router, &cfg.routes, files);
    }

    tracing::info!(routes = router.len(), "Route table ready");
    router
}
