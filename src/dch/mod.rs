//! DCH chunk-protocol parsing and encoding.
//!
//! DCH is the streaming protocol carrying diagnostic traffic out of the test
//! hardware's debug port (TCP, typically port 4905). This module decodes one
//! transport read into its frames and re-encodes losslessly; only the
//! radio-diagnostic (PTI) frame types are of interest here, everything else
//! is dropped at the frame gate.

mod frame;
mod packet;

pub use frame::{DCH_END, DCH_START, DchFrame, DchHeader, DchType};
pub use packet::DchPacket;
