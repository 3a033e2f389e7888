// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//==============================================================================
// Imports
//==============================================================================

use ::flexi_logger::{
    Logger,
    LoggerHandle,
};
use ::std::sync::{
    Once,
    OnceLock,
};

//==============================================================================
// Static Variables
//==============================================================================

/// Guardian to the logging initialize function.
static INIT_LOG: Once = Once::new();

/// Keeps the logger alive for the lifetime of the process.
static LOG_HANDLE: OnceLock<LoggerHandle> = OnceLock::new();

/// Log specification used when `RUST_LOG` is not set.
const DEFAULT_LOG_SPEC: &str = "info";

//==============================================================================
// Standalone Functions
//==============================================================================

/// Initializes logging features. The log level is taken from the `RUST_LOG` environment variable.
pub fn initialize() {
    INIT_LOG.call_once(|| {
        match Logger::try_with_env_or_str(DEFAULT_LOG_SPEC).and_then(|logger| logger.start()) {
            Ok(handle) => {
                let _ = LOG_HANDLE.set(handle);
            },
            // Another logger may already be installed, or RUST_LOG may be malformed.
            Err(e) => eprintln!("failed to initialize logger: {}", e),
        }
    });
}

//==============================================================================
// Unit Tests
//==============================================================================
