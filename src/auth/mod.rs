//! Client-Side Auth Heuristics
//!
//! Everything the auth screens decide without the server:
//! - [`password`]: strength scoring, meter thresholds, policy pre-checks
//! - [`forms`]: login/register field validation
//! - [`otp`]: digits-only code input and the resend cooldown
//! - [`flash`]: transient status messages with auto-expiry
//!
//! The server remains authoritative; these checks only surface problems
//! before a round-trip.

mod flash;
mod forms;
mod otp;
mod password;

pub use flash::{Flash, FlashBoard, FlashLevel, FLASH_TTL};
pub use forms::{FieldError, LoginForm, RegisterForm};
pub use otp::{OtpInput, ResendCooldown, OTP_LEN, RESEND_COOLDOWN};
pub use password::{
    confirm_state, password_strength, policy_violations, MatchState, PolicyRule, StrengthLabel,
    StrengthReport,
};
