//! # Subject Catalog — Single Source of Truth
//!
//! Defines the [`Subject`] enum with all 20 course names students may
//! leave feedback on. This is the single definition used by every crate
//! in the workspace; the compiler enforces exhaustive `match`, so the
//! catalog cannot silently diverge between the API layer and analytics.
//!
//! Serialized form is the human-readable course name (e.g.
//! `"Operating Systems"`), matching the wire format the client submits.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A course in the fixed feedback catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subject {
    /// Data Structures and Algorithms.
    #[serde(rename = "Data Structures and Algorithms")]
    DataStructuresAndAlgorithms,
    /// Object-Oriented Programming.
    #[serde(rename = "Object-Oriented Programming")]
    ObjectOrientedProgramming,
    /// Database Management Systems.
    #[serde(rename = "Database Management Systems")]
    DatabaseManagementSystems,
    /// Operating Systems.
    #[serde(rename = "Operating Systems")]
    OperatingSystems,
    /// Computer Networks.
    #[serde(rename = "Computer Networks")]
    ComputerNetworks,
    /// Software Engineering.
    #[serde(rename = "Software Engineering")]
    SoftwareEngineering,
    /// Web Development.
    #[serde(rename = "Web Development")]
    WebDevelopment,
    /// Artificial Intelligence.
    #[serde(rename = "Artificial Intelligence")]
    ArtificialIntelligence,
    /// Machine Learning.
    #[serde(rename = "Machine Learning")]
    MachineLearning,
    /// Computer Architecture.
    #[serde(rename = "Computer Architecture")]
    ComputerArchitecture,
    /// Theory of Computation.
    #[serde(rename = "Theory of Computation")]
    TheoryOfComputation,
    /// Compiler Design.
    #[serde(rename = "Compiler Design")]
    CompilerDesign,
    /// Computer Graphics.
    #[serde(rename = "Computer Graphics")]
    ComputerGraphics,
    /// Cryptography and Network Security.
    #[serde(rename = "Cryptography and Network Security")]
    CryptographyAndNetworkSecurity,
    /// Cloud Computing.
    #[serde(rename = "Cloud Computing")]
    CloudComputing,
    /// Big Data Analytics.
    #[serde(rename = "Big Data Analytics")]
    BigDataAnalytics,
    /// Mobile App Development.
    #[serde(rename = "Mobile App Development")]
    MobileAppDevelopment,
    /// Digital Logic Design.
    #[serde(rename = "Digital Logic Design")]
    DigitalLogicDesign,
    /// Discrete Mathematics.
    #[serde(rename = "Discrete Mathematics")]
    DiscreteMathematics,
    /// Python Programming.
    #[serde(rename = "Python Programming")]
    PythonProgramming,
}

impl Subject {
    /// Return all catalog subjects as a slice.
    ///
    /// Useful for iteration when the full catalog is needed (e.g. the
    /// client's subject picker, exhaustive aggregation).
    pub fn all() -> &'static [Subject] {
        &[
            Self::DataStructuresAndAlgorithms,
            Self::ObjectOrientedProgramming,
            Self::DatabaseManagementSystems,
            Self::OperatingSystems,
            Self::ComputerNetworks,
            Self::SoftwareEngineering,
            Self::WebDevelopment,
            Self::ArtificialIntelligence,
            Self::MachineLearning,
            Self::ComputerArchitecture,
            Self::TheoryOfComputation,
            Self::CompilerDesign,
            Self::ComputerGraphics,
            Self::CryptographyAndNetworkSecurity,
            Self::CloudComputing,
            Self::BigDataAnalytics,
            Self::MobileAppDevelopment,
            Self::DigitalLogicDesign,
            Self::DiscreteMathematics,
            Self::PythonProgramming,
        ]
    }

    /// Return the catalog display name for this subject.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DataStructuresAndAlgorithms => "Data Structures and Algorithms",
            Self::ObjectOrientedProgramming => "Object-Oriented Programming",
            Self::DatabaseManagementSystems => "Database Management Systems",
            Self::OperatingSystems => "Operating Systems",
            Self::ComputerNetworks => "Computer Networks",
            Self::SoftwareEngineering => "Software Engineering",
            Self::WebDevelopment => "Web Development",
            Self::ArtificialIntelligence => "Artificial Intelligence",
            Self::MachineLearning => "Machine Learning",
            Self::ComputerArchitecture => "Computer Architecture",
            Self::TheoryOfComputation => "Theory of Computation",
            Self::CompilerDesign => "Compiler Design",
            Self::ComputerGraphics => "Computer Graphics",
            Self::CryptographyAndNetworkSecurity => "Cryptography and Network Security",
            Self::CloudComputing => "Cloud Computing",
            Self::BigDataAnalytics => "Big Data Analytics",
            Self::MobileAppDevelopment => "Mobile App Development",
            Self::DigitalLogicDesign => "Digital Logic Design",
            Self::DiscreteMathematics => "Discrete Mathematics",
            Self::PythonProgramming => "Python Programming",
        }
    }
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Subject {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .find(|subject| subject.as_str() == s)
            .copied()
            .ok_or_else(|| ValidationError::UnknownSubject(s.to_string()))
    }
}
