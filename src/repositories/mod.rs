mod api_repositories;
mod traits;

pub use api_repositories::{
    ApiAuthRepository, ApiCommunityRepository, ApiContributionRepository, ApiParishRepository,
    ApiReportRepository, ApiTitherRepository,
};
pub use traits::{
    AuthRepository, CommunityRepository, ContributionRepository, ParishRepository,
    ReportRepository, TitherRepository,
};
