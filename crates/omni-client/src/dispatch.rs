//! Request dispatch: one HTTP call per request descriptor.

use omni_core::{RequestDescriptor, ResponseMode, ResultSet};
use tracing::debug;

use crate::envelope::unwrap_response;
use crate::error::ClientResult;
use crate::transport::Transport;
use crate::wire::Endpoint;

/// Send `request` and unwrap the response envelope.
///
/// Insert/Update requests must already carry their synthesized payload.
pub async fn dispatch<T: Transport>(
    transport: &T,
    endpoint: &Endpoint,
    mode: ResponseMode,
    request: &RequestDescriptor,
) -> ClientResult<ResultSet> {
    let http_request = endpoint.request(request)?;
    debug!(
        verb = %request.verb,
        table = %request.path,
        filter = %request.filter,
        "dispatching request"
    );

    let response = transport.send(http_request, endpoint.timeout()).await?;
    debug!(status = %response.status(), table = %request.path, "request completed");

    unwrap_response(response.body(), mode)
}
