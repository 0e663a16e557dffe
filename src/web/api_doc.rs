use utoipa::OpenApi;

use crate::feed::{OrbitalElementRecord, Source};
use crate::propagator::Configure;
use crate::render::ObjectSample;

use super::api::error::ErrorResponse;
use super::api::tle::TleResponse;
use super::api::tracker::{BufferResponse, InitRequest, InitResponse, PositionsResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::tle::get_default_set,
        super::api::tle::get_set,
        super::api::tracker::init,
        super::api::tracker::update,
        super::api::tracker::config,
        super::api::tracker::stop,
        super::api::tracker::buffer,
        super::api::tracker::positions,
    ),
    components(
        schemas(
            TleResponse,
            OrbitalElementRecord,
            Source,
            InitRequest,
            InitResponse,
            Configure,
            BufferResponse,
            PositionsResponse,
            ObjectSample,
            ErrorResponse,
        )
    ),
    info(
        title = "Cosmic Eye API",
        description = "Orbital element feed proxy and live position tracker",
        version = "0.1.0"
    ),
    tags(
        (name = "feed", description = "Cached two-line element sets"),
        (name = "tracker", description = "Background propagation and interpolated positions")
    )
)]
pub struct ApiDoc;
