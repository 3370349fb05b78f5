//! Actix-backed route table.
//!
//! Routes are declared once, grouped by controller. The table registers them
//! with Actix ([`RouteTable::configure`]) and keeps the metadata the
//! exemption resolver reads, so routing and exemptions cannot drift apart.
//!
//! # Example
//! ```ignore
//! let table = RouteTable::builder()
//!     .controller(
//!         Controller::new("OpenController")
//!             .request_mapping(["/admin/base/open"])
//!             .route(Route::post("/login", login).token_ignore())
//!             .route(Route::get("/refresh", refresh)),
//!     )
//!     .build();
//!
//! App::new().configure(|cfg| table.configure(cfg));
//! ```

use std::fmt;
use std::sync::Arc;

use actix_web::http::Method;
use actix_web::{web, FromRequest, Handler, Responder};

use crate::http::error::{IntrospectionError, RegistryError};

use super::{
    combine_patterns, HandlerMethod, HandlerType, MarkerLookup, MatchCondition, Marker,
    MarkerTable, MethodId, MethodMeta, PathPattern, RouteRegistry,
};

type RouteFactory = Arc<dyn Fn() -> actix_web::Route + Send + Sync>;

/// A single handler declaration.
pub struct Route {
    method: Option<Method>,
    patterns: Vec<PathPattern>,
    name: String,
    meta: MethodMeta,
    factory: RouteFactory,
}

impl Route {
    pub fn method<F, Args>(method: Method, pattern: &str, handler: F) -> Self
    where
        F: Handler<Args> + Send + Sync,
        Args: FromRequest + 'static,
        F::Output: Responder + 'static,
    {
        Self::build(Some(method), vec![PathPattern::new(pattern)], handler)
    }

    pub fn get<F, Args>(pattern: &str, handler: F) -> Self
    where
        F: Handler<Args> + Send + Sync,
        Args: FromRequest + 'static,
        F::Output: Responder + 'static,
    {
        Self::method(Method::GET, pattern, handler)
    }

    pub fn post<F, Args>(pattern: &str, handler: F) -> Self
    where
        F: Handler<Args> + Send + Sync,
        Args: FromRequest + 'static,
        F::Output: Responder + 'static,
    {
        Self::method(Method::POST, pattern, handler)
    }

    pub fn put<F, Args>(pattern: &str, handler: F) -> Self
    where
        F: Handler<Args> + Send + Sync,
        Args: FromRequest + 'static,
        F::Output: Responder + 'static,
    {
        Self::method(Method::PUT, pattern, handler)
    }

    pub fn delete<F, Args>(pattern: &str, handler: F) -> Self
    where
        F: Handler<Args> + Send + Sync,
        Args: FromRequest + 'static,
        F::Output: Responder + 'static,
    {
        Self::method(Method::DELETE, pattern, handler)
    }

    pub fn patch<F, Args>(pattern: &str, handler: F) -> Self
    where
        F: Handler<Args> + Send + Sync,
        Args: FromRequest + 'static,
        F::Output: Responder + 'static,
    {
        Self::method(Method::PATCH, pattern, handler)
    }

    /// Fallback handler for requests no other route matches.
    ///
    /// It has no structural pattern, so it never contributes an exemption.
    pub fn default_service<F, Args>(handler: F) -> Self
    where
        F: Handler<Args> + Send + Sync,
        Args: FromRequest + 'static,
        F::Output: Responder + 'static,
    {
        Self::build(None, Vec::new(), handler)
    }

    fn build<F, Args>(method: Option<Method>, patterns: Vec<PathPattern>, handler: F) -> Self
    where
        F: Handler<Args> + Send + Sync,
        Args: FromRequest + 'static,
        F::Output: Responder + 'static,
    {
        let route_method = method.clone();
        let factory: RouteFactory = Arc::new(move || {
            let route = match &route_method {
                Some(m) => web::method(m.clone()),
                None => web::route(),
            };
            route.to(handler.clone())
        });

        Route {
            method,
            patterns,
            name: handler_name::<F>(),
            meta: MethodMeta::new(),
            factory,
        }
    }

    /// Adds another pattern routed to the same handler.
    pub fn pattern(mut self, pattern: &str) -> Self {
        self.patterns.push(PathPattern::new(pattern));
        self
    }

    /// Overrides the method name (defaults to the handler's function name).
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Exempts the route from authentication.
    pub fn token_ignore(self) -> Self {
        self.marker(Marker::TOKEN_IGNORE)
    }

    pub fn marker(mut self, marker: Marker) -> Self {
        self.meta = self.meta.marker(marker);
        self
    }

    /// Links the handler to the method it implements, e.g. `"OpenApi::login"`.
    /// Markers declared there apply to this handler too.
    pub fn overrides(mut self, parent: impl Into<MethodId>) -> Self {
        self.meta = self.meta.overrides(parent);
        self
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("patterns", &self.patterns)
            .field("name", &self.name)
            .field("meta", &self.meta)
            .finish_non_exhaustive()
    }
}

fn handler_name<F>() -> String {
    let full = std::any::type_name::<F>();
    full.rsplit("::").next().unwrap_or(full).to_string()
}

/// A group of routes sharing a declaring type and its class-level prefixes.
#[derive(Debug)]
pub struct Controller {
    bean_type: HandlerType,
    routes: Vec<Route>,
}

impl Controller {
    pub fn new(name: impl Into<String>) -> Self {
        Controller {
            bean_type: HandlerType::new(name),
            routes: Vec::new(),
        }
    }

    /// Class-level prefixes. Every route is mounted under each of them.
    pub fn request_mapping<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bean_type = self.bean_type.request_mapping(prefixes);
        self
    }

    pub fn route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }
}

/// Types that describe themselves as a [`Controller`].
///
/// Usually implemented by `#[rest_controller]`.
pub trait RestController {
    fn controller() -> Controller;
}

/// Method metadata without routes, for handlers to inherit through
/// [`Route::overrides`].
#[derive(Debug, Clone)]
pub struct Interface {
    name: String,
    methods: Vec<(String, MethodMeta)>,
}

impl Interface {
    pub fn new(name: impl Into<String>) -> Self {
        Interface {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    pub fn method(mut self, name: impl Into<String>, meta: MethodMeta) -> Self {
        self.methods.push((name.into(), meta));
        self
    }
}

struct RouteEntry {
    condition: MatchCondition,
    handler: HandlerMethod,
    factory: RouteFactory,
}

/// Registered routes plus their marker metadata.
///
/// Cheap to clone; share one table between the exemption resolver and the
/// `HttpServer` factory.
#[derive(Clone, Default)]
pub struct RouteTable {
    entries: Arc<Vec<RouteEntry>>,
    markers: Arc<MarkerTable>,
}

impl RouteTable {
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn markers(&self) -> &MarkerTable {
        &self.markers
    }

    /// Registers every route with Actix, once per `(prefix, pattern)` pair.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        for entry in self.entries.iter() {
            match entry.condition.patterns() {
                Some(patterns) => {
                    let prefixes = entry.handler.bean_type().prefixes();
                    for path in combine_patterns(prefixes, patterns) {
                        cfg.route(&path, (entry.factory)());
                    }
                }
                None => {
                    cfg.default_service((entry.factory)());
                }
            }
        }
    }
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTable")
            .field("routes", &self.entries.len())
            .field("methods", &self.markers.len())
            .finish()
    }
}

impl RouteRegistry for RouteTable {
    fn handler_methods(&self) -> Result<Vec<(MatchCondition, HandlerMethod)>, RegistryError> {
        Ok(self
            .entries
            .iter()
            .map(|entry| (entry.condition.clone(), entry.handler.clone()))
            .collect())
    }
}

impl MarkerLookup for RouteTable {
    fn find_merged_marker(
        &self,
        method: &MethodId,
        marker: &Marker,
    ) -> Result<bool, IntrospectionError> {
        self.markers.find_merged_marker(method, marker)
    }
}

/// Builder for [`RouteTable`].
#[derive(Default)]
pub struct RouteTableBuilder {
    entries: Vec<RouteEntry>,
    markers: MarkerTable,
}

impl RouteTableBuilder {
    pub fn controller(mut self, controller: Controller) -> Self {
        let bean_type = Arc::new(controller.bean_type);

        for route in controller.routes {
            let name = self.unique_name(&bean_type, route.name);
            let handler = HandlerMethod::new(Arc::clone(&bean_type), name);
            self.markers.register(handler.id(), route.meta);
            self.entries.push(RouteEntry {
                condition: MatchCondition::new(route.patterns).with_methods(route.method),
                handler,
                factory: route.factory,
            });
        }
        self
    }

    pub fn rest_controller<C: RestController>(self) -> Self {
        self.controller(C::controller())
    }

    pub fn interface(mut self, interface: Interface) -> Self {
        for (method, meta) in interface.methods {
            self.markers
                .register(MethodId::new(&interface.name, &method), meta);
        }
        self
    }

    /// Routes never share marker metadata: a second route with the same
    /// `Type::name` (a handler mounted twice, or two closures) is registered
    /// as `Type::name#2`, and so on.
    fn unique_name(&self, bean_type: &HandlerType, name: String) -> String {
        let mut candidate = name.clone();
        let mut ordinal = 1;
        while self
            .markers
            .get(&MethodId::new(bean_type.name(), &candidate))
            .is_some()
        {
            ordinal += 1;
            candidate = format!("{}#{}", name, ordinal);
        }
        candidate
    }

    pub fn build(self) -> RouteTable {
        RouteTable {
            entries: Arc::new(self.entries),
            markers: Arc::new(self.markers),
        }
    }
}
