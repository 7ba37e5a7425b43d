//! Static informational pages.

use actix_web::HttpResponse;

use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::AppResult;
use crate::views::{AboutAuthorTemplate, AboutTechTemplate, render};

/// GET /about/author/
pub async fn author(identity: OptionalIdentity) -> AppResult<HttpResponse> {
    render(AboutAuthorTemplate {
        nav: (&identity).into(),
    })
}

/// GET /about/tech/
pub async fn tech(identity: OptionalIdentity) -> AppResult<HttpResponse> {
    render(AboutTechTemplate {
        nav: (&identity).into(),
    })
}
