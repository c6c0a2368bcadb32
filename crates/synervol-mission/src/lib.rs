mod command;
mod dispatcher;
mod selection;
mod transport;

pub use command::{Coordinates, Dimensions, MessageType, MissionCommand, API_VERSION};
pub use dispatcher::{
    DispatchHandle, DispatchOutcome, DispatchState, MissionDispatcher, DEFAULT_CONNECT_TIMEOUT,
};
pub use selection::Selection;
pub use transport::{
    MissionConnection, MissionTransport, TransportError, WebSocketTransport,
    DEFAULT_MISSION_ENDPOINT,
};
