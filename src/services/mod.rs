pub mod auth_service;
pub use auth_service::{AuthError, AuthService, Registration};

pub mod auth_service_impl;
pub use auth_service_impl::SeaOrmAuthService;

pub mod resource_service;
pub use resource_service::{ResourceError, ResourceService};

pub mod resource_service_impl;
pub use resource_service_impl::DefaultResourceService;
