//! Customer endpoints: login, registration, cards and addresses.
//!
//! Each endpoint classifies the service error once: the first matching
//! domain condition picks the status, anything else is left unclassified and
//! rendered as a generic 500.

use std::sync::Arc;

use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use super::{endpoint, path_id};
use crate::api::httpkit::{ApiError, HandlerError, HandlerResult, HttpRequest, Reply};
use crate::api::router::{Route, Routes};
use crate::domain::{AddressResponse, CardResponse, CustomerResponse, LinkDomain, NewAddress, NewCard};
use crate::errors::AppError;
use crate::services::{CustomerService, Registration};

const USER_NOT_AUTHORISED: &str = "user not authorised";
const USER_NOT_FOUND: &str = "user not found";
const CARD_NOT_FOUND: &str = "card not found";
const ADDRESS_NOT_FOUND: &str = "address not found";

/// Registration body
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    pub email: String,
}

/// New card body
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CardRequest {
    pub long_num: String,
    pub expires: String,
    pub ccv: String,
}

/// New address body
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AddressRequest {
    pub street: String,
    pub number: String,
    pub country: String,
    pub city: String,
    pub postcode: String,
}

/// Customer service plus the domain used to build `_links`.
pub struct CustomerRoutes {
    context: Arc<CustomerContext>,
}

struct CustomerContext {
    service: Arc<dyn CustomerService>,
    links: LinkDomain,
}

impl CustomerRoutes {
    pub fn new(service: Arc<dyn CustomerService>, links: LinkDomain) -> Self {
        Self {
            context: Arc::new(CustomerContext { service, links }),
        }
    }
}

impl Routes for CustomerRoutes {
    fn routes(&self) -> Vec<Route> {
        let ctx = &self.context;
        vec![
            Route::post("/login", endpoint(ctx, login)),
            Route::post("/customers", endpoint(ctx, register)),
            Route::get("/customers/{id}", endpoint(ctx, get_customer)),
            Route::get("/customers/{id}/cards", endpoint(ctx, customer_cards)),
            Route::get("/customers/{id}/addresses", endpoint(ctx, customer_addresses)),
            Route::post("/customers/{id}/cards", endpoint(ctx, create_card)),
            Route::post("/customers/{id}/addresses", endpoint(ctx, create_address)),
            Route::get("/cards/{id}", endpoint(ctx, get_card)),
            Route::get("/addresses/{id}", endpoint(ctx, get_address)),
        ]
    }
}

/// Map a not-found service error to 404 with `message`, leave the rest.
fn not_found_as(message: &'static str) -> impl Fn(AppError) -> HandlerError {
    move |err| {
        if err.is_not_found() {
            ApiError::not_found(message).with_cause(err).into()
        } else {
            err.into()
        }
    }
}

async fn login(ctx: Arc<CustomerContext>, req: HttpRequest) -> HandlerResult {
    let Some((username, password)) = req.basic_auth() else {
        return Err(ApiError::unauthorized(USER_NOT_AUTHORISED).into());
    };

    match ctx.service.login(&username, &password).await {
        Ok(customer) => Reply::json(StatusCode::OK, &CustomerResponse::new(customer, &ctx.links)),
        Err(err) if err.is_not_found() => {
            Err(ApiError::not_found(USER_NOT_FOUND).with_cause(err).into())
        }
        Err(err) if err.is_unauthorized() => {
            Err(ApiError::unauthorized(USER_NOT_AUTHORISED).with_cause(err).into())
        }
        Err(err) => Err(ApiError::internal("user login failed").with_cause(err).into()),
    }
}

async fn register(ctx: Arc<CustomerContext>, mut req: HttpRequest) -> HandlerResult {
    let body: RegisterRequest = req.json_validated().await?;

    let registration = Registration {
        first_name: body.first_name,
        last_name: body.last_name,
        email: body.email,
        username: body.username,
        password: body.password,
    };

    match ctx.service.register(registration).await {
        Ok(id) => Reply::json(StatusCode::CREATED, &json!({ "id": id })),
        Err(err) if err.duplicate_entity().is_some() => Err(ApiError::conflict(
            "username or email already exists",
        )
        .with_cause(err)
        .into()),
        Err(err) if err.is_validation() => Err(ApiError::bad_request(err.root().to_string())
            .with_cause(err)
            .into()),
        Err(err) => Err(ApiError::internal("user registration failed")
            .with_cause(err)
            .into()),
    }
}

async fn get_customer(ctx: Arc<CustomerContext>, req: HttpRequest) -> HandlerResult {
    let id = path_id(&req, USER_NOT_FOUND)?;

    let customer = ctx
        .service
        .get_customer(id)
        .await
        .map_err(not_found_as(USER_NOT_FOUND))?;
    Reply::json(StatusCode::OK, &CustomerResponse::new(customer, &ctx.links))
}

async fn customer_cards(ctx: Arc<CustomerContext>, req: HttpRequest) -> HandlerResult {
    let id = path_id(&req, USER_NOT_FOUND)?;

    let cards: Vec<CardResponse> = ctx
        .service
        .customer_cards(id)
        .await
        .map_err(not_found_as(USER_NOT_FOUND))?
        .into_iter()
        .map(|card| CardResponse::new(card, &ctx.links))
        .collect();
    Reply::json(StatusCode::OK, &json!({ "cards": cards }))
}

async fn customer_addresses(ctx: Arc<CustomerContext>, req: HttpRequest) -> HandlerResult {
    let id = path_id(&req, USER_NOT_FOUND)?;

    let addresses: Vec<AddressResponse> = ctx
        .service
        .customer_addresses(id)
        .await
        .map_err(not_found_as(USER_NOT_FOUND))?
        .into_iter()
        .map(|address| AddressResponse::new(address, &ctx.links))
        .collect();
    Reply::json(StatusCode::OK, &json!({ "addresses": addresses }))
}

async fn create_card(ctx: Arc<CustomerContext>, mut req: HttpRequest) -> HandlerResult {
    let customer_id = path_id(&req, USER_NOT_FOUND)?;
    let body: CardRequest = req.json().await?;

    let card = NewCard {
        long_num: body.long_num,
        expires: body.expires,
        ccv: body.ccv,
    };

    match ctx.service.create_card(customer_id, card).await {
        Ok(id) => created_id(id),
        Err(err) if err.duplicate_entity().is_some() => {
            Err(ApiError::conflict("card already registered").with_cause(err).into())
        }
        Err(err) if err.is_not_found() => {
            Err(ApiError::not_found(USER_NOT_FOUND).with_cause(err).into())
        }
        Err(err) => Err(ApiError::internal("adding card failed").with_cause(err).into()),
    }
}

async fn create_address(ctx: Arc<CustomerContext>, mut req: HttpRequest) -> HandlerResult {
    let customer_id = path_id(&req, USER_NOT_FOUND)?;
    let body: AddressRequest = req.json().await?;

    let address = NewAddress {
        street: body.street,
        number: body.number,
        country: body.country,
        city: body.city,
        postcode: body.postcode,
    };

    match ctx.service.create_address(customer_id, address).await {
        Ok(id) => created_id(id),
        Err(err) if err.is_not_found() => {
            Err(ApiError::not_found(USER_NOT_FOUND).with_cause(err).into())
        }
        Err(err) => Err(ApiError::internal("adding address failed").with_cause(err).into()),
    }
}

async fn get_card(ctx: Arc<CustomerContext>, req: HttpRequest) -> HandlerResult {
    let id = path_id(&req, CARD_NOT_FOUND)?;

    let card = ctx
        .service
        .get_card(id)
        .await
        .map_err(not_found_as(CARD_NOT_FOUND))?;
    Reply::json(StatusCode::OK, &CardResponse::new(card, &ctx.links))
}

async fn get_address(ctx: Arc<CustomerContext>, req: HttpRequest) -> HandlerResult {
    let id = path_id(&req, ADDRESS_NOT_FOUND)?;

    let address = ctx
        .service
        .get_address(id)
        .await
        .map_err(not_found_as(ADDRESS_NOT_FOUND))?;
    Reply::json(StatusCode::OK, &AddressResponse::new(address, &ctx.links))
}

/// Card and address creation answer 200 with the new id.
fn created_id(id: Uuid) -> HandlerResult {
    Reply::json(StatusCode::OK, &json!({ "id": id }))
}
