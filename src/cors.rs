use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::{options, Request, Response};

/// Adds CORS headers for requests coming from an allowed origin.
pub struct Cors {
    allowed_origins: Vec<String>,
}

impl Cors {
    pub fn new(allowed_origins: Vec<String>) -> Self {
        Cors { allowed_origins }
    }

    fn allows(&self, origin: &str) -> bool {
        self.allowed_origins
            .iter()
            .any(|allowed| allowed == "*" || allowed == origin)
    }
}

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, request: &'r Request<'_>, response: &mut Response<'r>) {
        let Some(origin) = request.headers().get_one("Origin") else {
            return;
        };
        if !self.allows(origin) {
            return;
        }

        response.set_header(Header::new("Access-Control-Allow-Origin", origin.to_string()));
        response.set_header(Header::new("Vary", "Origin"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "GET, POST, PUT, PATCH, DELETE, OPTIONS",
        ));
        let requested_headers = request
            .headers()
            .get_one("Access-Control-Request-Headers")
            .unwrap_or("*")
            .to_string();
        response.set_header(Header::new("Access-Control-Allow-Headers", requested_headers));
        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
    }
}

/// Answers CORS preflight requests; the fairing adds the headers.
#[options("/<_..>")]
pub fn preflight() -> Status {
    Status::NoContent
}
