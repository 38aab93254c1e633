/*! deskshell JSON-RPC over WebSocket. */

mod remote;
mod rpc;
mod server;

pub use remote::RemoteContent;
pub use rpc::{dispatch, dispatch_json, RpcRequest, RpcResponse};
pub use server::{start_server, WebSocketState, DEFAULT_WS_PORT};
