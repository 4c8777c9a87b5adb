/*! Integration tests for the Directus client.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure mirrors the main library structure:
 * - client: Tests for the Client handle and the Collection CRUD facade
 * - paths: Tests for schema flattening into the `fields` parameter
 * - query: Tests for query encoding as seen by the transport, per dialect
 * - serialization: Tests for write-record encoding and read-record decoding
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("directus_client=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod client;
mod paths;
