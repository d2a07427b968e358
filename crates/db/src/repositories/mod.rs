//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod admin_repo;
pub mod application_repo;
pub mod brand_repo;
pub mod campaign_repo;
pub mod city_repo;
pub mod credit_transaction_repo;
pub mod experience_repo;
pub mod influencer_repo;
pub mod invitation_repo;
pub mod niche_repo;
pub mod notification_repo;
pub mod otp_repo;
pub mod pro_subscription_repo;
pub mod profile_review_repo;
pub mod session_repo;
pub mod upi_repo;

pub use admin_repo::AdminRepo;
pub use application_repo::ApplicationRepo;
pub use brand_repo::BrandRepo;
pub use campaign_repo::CampaignRepo;
pub use city_repo::CityRepo;
pub use credit_transaction_repo::CreditTransactionRepo;
pub use experience_repo::ExperienceRepo;
pub use influencer_repo::InfluencerRepo;
pub use invitation_repo::InvitationRepo;
pub use niche_repo::NicheRepo;
pub use notification_repo::NotificationRepo;
pub use otp_repo::OtpRepo;
pub use pro_subscription_repo::ProSubscriptionRepo;
pub use profile_review_repo::ProfileReviewRepo;
pub use session_repo::SessionRepo;
pub use upi_repo::UpiRepo;
