//! Development server.
//!
//! A blocking `tiny_http` loop that answers one request at a time: decode the
//! request path into a [`Route`], resolve and render it through the [`Site`],
//! and write the result. No rendered output is cached, so edits show up on
//! the next request.
//!
//! ## Status mapping
//!
//! | Outcome | Status | Body |
//! |---------|--------|------|
//! | rendered | 200 | payload, `Content-Type` from the renderer |
//! | [`SiteError::NotFound`] | 404 | fallback HTML page |
//! | any other error | 500 | HTML page with the error message |
//! | method other than GET/HEAD | 405 | plain text |

use crate::error::SiteError;
use crate::render::RenderedOutput;
use crate::routes::Route;
use crate::site::Site;
use maud::{DOCTYPE, Markup, html};
use percent_encoding::percent_decode_str;
use thiserror::Error;
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};
use tracing::{error, info, warn};

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("Could not bind {addr}: {message}")]
    Bind { addr: String, message: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A fully decided HTTP response, independent of the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: String,
    pub body: Vec<u8>,
}

/// Serve `site` on `host:port` until the process is stopped.
pub fn serve(site: &Site, host: &str, port: u16) -> Result<(), ServeError> {
    let addr = format!("{host}:{port}");
    let server = Server::http(&addr).map_err(|e| ServeError::Bind {
        addr: addr.clone(),
        message: e.to_string(),
    })?;
    info!(%addr, root = %site.root().display(), "serving");

    for request in server.incoming_requests() {
        if let Err(err) = handle(site, request) {
            warn!(error = %err, "failed to send response");
        }
    }
    Ok(())
}

fn handle(site: &Site, request: Request) -> Result<(), ServeError> {
    let reply = reply_for(site, request.method(), request.url());
    info!(method = %request.method(), url = request.url(), status = reply.status);

    let mut response = Response::from_data(reply.body).with_status_code(StatusCode(reply.status));
    if let Ok(header) = Header::from_bytes("Content-Type", reply.content_type.as_str()) {
        response = response.with_header(header);
    }
    request.respond(response)?;
    Ok(())
}

/// Decide the response for one request.
pub fn reply_for(site: &Site, method: &Method, url: &str) -> Reply {
    let head = match method {
        Method::Get => false,
        Method::Head => true,
        _ => {
            return Reply {
                status: 405,
                content_type: "text/plain; charset=utf-8".to_string(),
                body: b"405 Method Not Allowed".to_vec(),
            };
        }
    };

    let route = route_from_url(url);
    let mut reply = match site.serve(&route) {
        Ok(rendered) => ok_reply(rendered),
        Err(SiteError::NotFound(_)) => Reply {
            status: 404,
            content_type: html_content_type(),
            body: not_found_page(&route).into_string().into_bytes(),
        },
        Err(err) => {
            error!(%route, error = %err, "request failed");
            Reply {
                status: 500,
                content_type: html_content_type(),
                body: error_page(&err).into_string().into_bytes(),
            }
        }
    };

    if head {
        reply.body.clear();
    }
    reply
}

/// Strip query and fragment, percent-decode, and normalize into a route.
pub fn route_from_url(url: &str) -> Route {
    let path = url.split(['?', '#']).next().unwrap_or("/");
    Route::new(&percent_decode_str(path).decode_utf8_lossy())
}

fn ok_reply(rendered: RenderedOutput) -> Reply {
    let content_type = if rendered.is_text() {
        format!("{}; charset=utf-8", rendered.content_type)
    } else {
        rendered.content_type.clone()
    };
    Reply {
        status: 200,
        content_type,
        body: rendered.into_bytes(),
    }
}

fn html_content_type() -> String {
    "text/html; charset=utf-8".to_string()
}

fn not_found_page(route: &Route) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { "404 Not Found" }
            }
            body {
                h1 { "404" }
                p { "Nothing answers " code { (route.as_str()) } "." }
            }
        }
    }
}

fn error_page(err: &SiteError) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { "500 Internal Server Error" }
            }
            body {
                h1 { "500" }
                pre { (err.to_string()) }
            }
        }
    }
}
