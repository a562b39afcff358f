//! Structured log event macros.
//!
//! These wrap `tracing`'s own macros with a `role` field so every log line
//! across the workspace carries the same minimal, greppable shape.

/// Log an event tagged with the emitting role (`hub`, `client`, `dht`, ...).
#[macro_export]
macro_rules! log_event {
    (info, $role:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::info!(role = $role, $($($field)*,)? $msg)
    };
    (warn, $role:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::warn!(role = $role, $($($field)*,)? $msg)
    };
    (error, $role:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::error!(role = $role, $($($field)*,)? $msg)
    };
    (debug, $role:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::debug!(role = $role, $($($field)*,)? $msg)
    };
}

/// Log a swap state-machine transition with standard fields.
#[macro_export]
macro_rules! log_swap_event {
    ($level:ident, $msg:expr, $hub_id:expr, $state:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            hub_id = %$hub_id,
            state = ?$state,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a DHT peer event with standard fields.
#[macro_export]
macro_rules! log_peer_event {
    ($level:ident, $msg:expr, $node_id:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            node_id = %$node_id,
            $($($field)*,)?
            $msg
        )
    };
}
