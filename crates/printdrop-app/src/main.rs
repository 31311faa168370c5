// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// printdrop — upload a document from any device on the LAN and print it on
// one named printer.
//
// Entry point. Initialises logging, loads the config, builds the services,
// and serves the upload page until Ctrl-C.

mod pages;
mod server;
mod services;

use std::process::ExitCode;

use printdrop_core::error::Result;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use services::app_services::AppServices;
use services::config_file;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("printdrop starting");

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "printdrop stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let config = config_file::load_config()?;
    let addr = config.socket_addr();
    let services = AppServices::init(config)?;

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "upload page listening");

    axum::serve(listener, server::router(services))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server closed");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // Without a signal handler the server can only be killed.
        warn!(error = %e, "could not listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
