//! Context descriptors
//!
//! The result of structural parsing: an action/target classification plus
//! the narrowed token subset the classification applies to. Parse failure is
//! carried as data (`ContextAction::Error`), never as an error value.

use std::fmt;

use crate::lexer::TokenList;

/// The operation a descriptor instructs downstream stages to perform
///
/// The byte codes are the wire representation used when descriptors are
/// persisted or handed to a compiler back end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextAction {
    NoOp,
    Create,
    End,
    Error,
}

impl ContextAction {
    pub fn opcode(&self) -> u8 {
        match self {
            ContextAction::NoOp => 0x00,
            ContextAction::Create => 0x01,
            ContextAction::End => 0x91,
            ContextAction::Error => 0xFE,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContextAction::NoOp => "NoOp",
            ContextAction::Create => "Create",
            ContextAction::End => "End",
            ContextAction::Error => "Error",
        }
    }
}

impl fmt::Display for ContextAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Context.{} (0x{:02x})", self.as_str(), self.opcode())
    }
}

/// The kind of definition a descriptor targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextTarget {
    None,
    Function,
    Variable,
    Constant,
    Type,
}

impl ContextTarget {
    pub fn code(&self) -> u8 {
        match self {
            ContextTarget::None => 0x00,
            ContextTarget::Function => 0x01,
            ContextTarget::Variable => 0x02,
            ContextTarget::Constant => 0x03,
            ContextTarget::Type => 0x04,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContextTarget::None => "None",
            ContextTarget::Function => "Function",
            ContextTarget::Variable => "Variable",
            ContextTarget::Constant => "Constant",
            ContextTarget::Type => "Type",
        }
    }
}

impl fmt::Display for ContextTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:02x})", self.as_str(), self.code())
    }
}

/// Structural-parse result flowing from the parse stage to the analysis stage
///
/// Consumed exactly once downstream. `data` is a narrowed token subset with
/// its own rebuilt backing buffer.
#[derive(Debug, Clone)]
pub struct ContextDescriptor {
    pub action: ContextAction,
    pub target: ContextTarget,
    pub data: TokenList,
}

impl ContextDescriptor {
    pub fn new(action: ContextAction, target: ContextTarget, data: TokenList) -> Self {
        Self {
            action,
            target,
            data,
        }
    }

    /// A descriptor representing a structural parse failure
    pub fn error() -> Self {
        Self::new(ContextAction::Error, ContextTarget::None, TokenList::empty())
    }
}
