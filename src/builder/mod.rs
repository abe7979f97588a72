//! Build orchestration and install-tree introspection.
//!
//! This module drives the CMake build of OpenCV and, given only a key-scoped
//! install prefix, rediscovers the include directory, library directory,
//! library names and linker arguments of what was installed.

pub mod cmake;
pub mod layout;
pub mod libnames;
pub mod link;

pub use cmake::{BuildType, CMakeBuilder};
pub use layout::InstallLayout;
pub use libnames::extract_lib_names;
pub use link::LinkPlan;
