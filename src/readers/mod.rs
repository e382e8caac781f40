pub mod observation_reader;
pub mod schema;
pub mod station_reader;

pub use observation_reader::{InputSplit, ObservationInput, ObservationReader};
pub use schema::{ObservationSchema, RequiredFields};
pub use station_reader::StationReader;
