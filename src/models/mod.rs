pub mod application;
pub mod course;
pub mod enrollment;
pub mod favorite;
pub mod homework;
pub mod lesson;
pub mod payment;
pub mod review;
pub mod teacher_profile;
pub mod user;

pub use application::{Application, ApplicationQuery, ApplicationStatus, NewApplicationRequest, ReviewApplicationRequest};
pub use course::{Course, CourseQuery, CourseStatus, NewCourseRequest, UpdateCourseRequest};
pub use enrollment::{Enrollment, EnrollmentCheck, EnrollmentQuery, EnrollmentStatus, NewEnrollmentRequest};
pub use favorite::{AddFavoriteRequest, Favorite, FavoriteChange, FavoriteCheck, FavoriteList};
pub use homework::{GradeHomeworkRequest, Homework, HomeworkQuery, HomeworkStatus, SubmitHomeworkRequest};
pub use lesson::{Lesson, LessonQuery, LessonType, NewLessonRequest, UpdateLessonRequest};
pub use payment::{NewPaymentRequest, Payment, PaymentQuery, PaymentStatus, PaymentSummary};
pub use review::{RatingSummary, Review, ReviewQuery, SubmitReviewRequest};
pub use teacher_profile::{TeacherProfile, TeacherProfileQuery, TeacherProfileView, TeacherStats, UpsertTeacherProfileRequest};
pub use user::{
    AuthResponse, ChangePasswordRequest, LoginRequest, RegisterRequest, Role, UpdateUserRequest, User,
    UserQuery, UserSummary,
};
