/// Router Module Index
///
/// Splits the page trees by access policy. The guard is applied at the module
/// level with an axum layer, so a page is protected by where it is mounted.

/// Pages and endpoints reachable by anyone: the public blog/portfolio tree,
/// health, logout and theme preferences.
pub mod public;

/// The `/auth` and `/admin` trees, wrapped by the route guard.
pub mod guarded;
