mod stub_directory;

pub use stub_directory::{StubProjectDirectory, StubUserDirectory};
