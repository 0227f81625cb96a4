//! Repository implementations

mod site;

pub use site::YamlSiteRepository;
