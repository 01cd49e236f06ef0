pub mod schedule_repo;
pub use schedule_repo::ScheduleRepository;
pub mod booking_repo;
pub use booking_repo::BookingRepository;
pub mod review_repo;
pub use review_repo::ReviewRepository;
pub mod payment_repo;
pub use payment_repo::PaymentRepository;
pub mod tutor_repo;
pub use tutor_repo::TutorRepository;
