//! User-action domain for the Stand With Crypto backend.
//!
//! Locales and deeplinks, call-to-action ordering, NFT contract metadata,
//! email template metadata and the client-facing projection of stored actions.

pub mod activity;
pub mod client_action;
pub mod cta;
pub mod deeplink;
pub mod email;
pub mod error;
pub mod locale;
pub mod nft;

pub use client_action::SensitiveUserAction;
pub use cta::{next_action, UserActionCta};
pub use deeplink::deeplink_url;
pub use error::{ConfigError, ProjectionError};
pub use locale::SupportedLocale;
pub use nft::{NftBackendMetadata, NftSlug};
pub use swc_db::models::UserActionType;
