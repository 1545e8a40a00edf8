//! Request identity
//!
//! Users are anonymous: each browser carries an encrypted `userId` cookie with a
//! UUID. Requests without a valid cookie get a fresh identity on the spot.

pub mod cipher;
pub mod identity;


pub use cipher::CookieCipher;
pub use identity::{CookieIdentity, Identity, IdentityProvider};
