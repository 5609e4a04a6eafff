pub mod session_flow;
