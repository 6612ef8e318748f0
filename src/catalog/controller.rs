use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde_json::{Value};
use crate::books::dto::CreateBookRequest;
use crate::catalog::command::add_book_cmd::{AddBookCommand, AddBookCommandRequest, AddBookCommandResponse};
use crate::catalog::command::get_book_cmd::{GetBookCommand, GetBookCommandRequest, GetBookCommandResponse};
use crate::catalog::command::query_books_cmd::{QueryBooksCommand, QueryBooksCommandRequest, QueryBooksCommandResponse};
use crate::catalog::command::remove_book_cmd::{RemoveBookCommand, RemoveBookCommandRequest, RemoveBookCommandResponse};
use crate::catalog::command::update_book_cmd::{UpdateBookCommand, UpdateBookCommandRequest, UpdateBookCommandResponse};
use crate::core::command::Command;
use crate::core::controller::{AppState, json_to_server_error, ServerError};

pub(crate) async fn create_book(
    State(state): State<AppState>,
    json: Json<Value>) -> Result<Json<AddBookCommandResponse>, ServerError> {
    let req: AddBookCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let res = AddBookCommand::new(state.service.clone()).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn query_books(
    State(state): State<AppState>,
    Query(req): Query<QueryBooksCommandRequest>) -> Result<Json<QueryBooksCommandResponse>, ServerError> {
    let res = QueryBooksCommand::new(state.service.clone()).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn describe_book(
    State(state): State<AppState>,
    Path(id): Path<String>) -> Result<Json<GetBookCommandResponse>, ServerError> {
    let req = GetBookCommandRequest { id };
    let res = GetBookCommand::new(state.service.clone()).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn put_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    json: Json<Value>) -> Result<Json<UpdateBookCommandResponse>, ServerError> {
    let data: CreateBookRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let req = UpdateBookCommandRequest::put(id.as_str(), data.name.as_str(), data.author.as_str());
    let res = UpdateBookCommand::new(state.service.clone()).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn patch_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    json: Json<Value>) -> Result<Json<UpdateBookCommandResponse>, ServerError> {
    let data: CreateBookRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let req = UpdateBookCommandRequest::patch(id.as_str(), data.name.as_str(), data.author.as_str());
    let res = UpdateBookCommand::new(state.service.clone()).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>) -> Result<Json<RemoveBookCommandResponse>, ServerError> {
    let req = RemoveBookCommandRequest { id };
    let res = RemoveBookCommand::new(state.service.clone()).execute(req).await?;
    Ok(Json(res))
}
