mod transmit;

pub use transmit::{ITransmit, StubTransmit, WebhookTransmit};
