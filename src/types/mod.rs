pub mod application;
pub mod favorite;
pub mod job;
pub mod notification;
pub mod pagination;
pub mod user;

pub use application::{Application, ApplicationStatus, ApplicationWithJob, JobSummary};
pub use favorite::{FavoriteJob, FavoriteJobWithJob, FavoriteToggle};
pub use job::{Job, JobStatus, SalaryRange};
pub use notification::{Notification, NotificationType};
pub use pagination::{Page, PageRequest, Pagination};
pub use user::{Role, User};
