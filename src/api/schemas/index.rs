use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ServiceBanner {
    pub message: &'static str,
    pub status: &'static str,
    pub endpoints: Endpoints,
}

#[derive(Debug, Serialize)]
pub struct Endpoints {
    pub auth: AuthEndpoints,
}

#[derive(Debug, Serialize)]
pub struct AuthEndpoints {
    pub login: &'static str,
    pub register: &'static str,
    pub me: &'static str,
}
