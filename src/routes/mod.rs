/// Router Module Index
///
/// Organizes the application's routing logic into security-segregated modules.
/// This structure ensures that access control is applied explicitly at the
/// module level, preventing accidental exposure of protected endpoints.
///
/// The three modules map directly to the access levels defined by the gate.

/// Routes accessible to all users: landing page, login, logout.
pub mod public;

/// Routes requiring Member-level access (any active role). Every handler is
/// guarded by the `RequireMember` extractor; the module-level middleware layer
/// repeats the check as defense in depth.
pub mod secure;

/// The control panel, requiring Management-level access (role 3 only).
pub mod admin;
