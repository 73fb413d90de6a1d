pub mod claims;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod utils;

pub use claims::Claims;
pub use jwt::JwtService;
pub use middleware::{bearer_claims, AuthMiddleware, AuthenticatedUser};
pub use password::{hash_password, verify_password};
pub use utils::{
    extract_claims_from_context, require_admin, require_self_or_admin, resolve_student_id,
};
