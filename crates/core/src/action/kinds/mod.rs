pub mod admin;
pub mod claim;
pub mod join;

pub use admin::{
    AssignNumbersAction, AssignNumbersError, ResetAction, ResetError, SetLockedAction,
    SetLockedError,
};
pub use claim::{ClaimAction, ClaimError, UnclaimAction, UnclaimError};
pub use join::{JoinAction, JoinError};
