pub mod application_service;
pub mod auth_service;
pub mod course_service;
pub mod enrollment_service;
pub mod favorite_service;
pub mod homework_service;
pub mod lesson_service;
pub mod payment_service;
pub mod review_service;
pub mod scheduler;
pub mod teacher_profile_service;

pub use application_service::ApplicationService;
pub use auth_service::AuthService;
pub use course_service::CourseService;
pub use enrollment_service::EnrollmentService;
pub use favorite_service::FavoriteService;
pub use homework_service::HomeworkService;
pub use lesson_service::LessonService;
pub use payment_service::PaymentService;
pub use review_service::ReviewService;
pub use scheduler::{StatusScheduler, refresh_course_statuses};
pub use teacher_profile_service::TeacherProfileService;
