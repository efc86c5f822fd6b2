pub mod court;
pub mod inventory;
pub mod professor;
pub mod profile;
pub mod review;
pub mod schedule;
pub mod shift;

pub use court::CourtRepository;
pub use inventory::InventoryRepository;
pub use professor::ProfessorRepository;
pub use profile::ProfileRepository;
pub use review::ReviewRepository;
pub use schedule::ScheduleRepository;
pub use shift::ShiftRepository;
