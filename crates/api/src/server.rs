//! Supervision of the REST and gRPC servers.

use std::error::Error as StdError;
use std::future::IntoFuture;

use thiserror::Error;
use tokio::sync::watch;

type BoxError = Box<dyn StdError + Send + Sync>;

/// A server stopped with an error.
#[derive(Debug, Error)]
#[error("{server} server failed: {source}")]
pub struct ServeError {
    pub server: &'static str,
    #[source]
    pub source: BoxError,
}

enum Running {
    Rest,
    Grpc,
}

/// Drives both servers until both have stopped.
///
/// Whichever server stops first, with or without an error, flips `shutdown`
/// so the other drains and stops too. The first error seen is returned.
pub async fn run_until_stopped<H, G, EH, EG>(
    rest: H,
    grpc: G,
    shutdown: &watch::Sender<bool>,
) -> Result<(), ServeError>
where
    H: IntoFuture<Output = Result<(), EH>>,
    G: IntoFuture<Output = Result<(), EG>>,
    EH: Into<BoxError>,
    EG: Into<BoxError>,
{
    let rest = async { rest.await.map_err(|e| failed("REST", e)) };
    let grpc = async { grpc.await.map_err(|e| failed("gRPC", e)) };
    tokio::pin!(rest, grpc);

    let (first, running) = tokio::select! {
        result = &mut rest => (result, Running::Grpc),
        result = &mut grpc => (result, Running::Rest),
    };

    match &first {
        Ok(()) => tracing::info!("server stopped, shutting down the other"),
        Err(err) => tracing::error!(error = %err, "server stopped, shutting down the other"),
    }
    let _ = shutdown.send(true);

    let second = match running {
        Running::Rest => rest.await,
        Running::Grpc => grpc.await,
    };
    if let Err(err) = &second {
        tracing::error!(error = %err, "server failed during shutdown");
    }

    first.and(second)
}

fn failed(server: &'static str, err: impl Into<BoxError>) -> ServeError {
    ServeError {
        server,
        source: err.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    async fn until_shutdown(mut rx: watch::Receiver<bool>) -> io::Result<()> {
        let _ = rx.wait_for(|stop| *stop).await;
        Ok(())
    }

    fn port_taken() -> io::Error {
        io::Error::new(io::ErrorKind::AddrInUse, "port taken")
    }

    #[tokio::test]
    async fn grpc_failure_stops_rest_and_is_reported() {
        let (tx, rx) = watch::channel(false);

        let err = run_until_stopped(until_shutdown(rx), async { Err::<(), _>(port_taken()) }, &tx)
            .await
            .unwrap_err();

        assert_eq!(err.server, "gRPC");
        assert_eq!(err.to_string(), "gRPC server failed: port taken");
        assert!(*tx.borrow());
    }

    #[tokio::test]
    async fn first_failure_wins_when_both_fail() {
        let (tx, mut rx) = watch::channel(false);
        let grpc = async move {
            let _ = rx.wait_for(|stop| *stop).await;
            Err::<(), _>(io::Error::other("drain failed"))
        };

        let err = run_until_stopped(async { Err::<(), _>(port_taken()) }, grpc, &tx)
            .await
            .unwrap_err();

        assert_eq!(err.server, "REST");
    }

    #[tokio::test]
    async fn clean_shutdown_is_ok() {
        let (tx, rx) = watch::channel(false);
        let servers = run_until_stopped(until_shutdown(rx.clone()), until_shutdown(rx), &tx);
        let signal = async {
            tx.send(true).unwrap();
        };

        let (result, ()) = tokio::join!(servers, signal);
        result.unwrap();
    }
}
