use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{
        CreatedResponse, MessageResponse, PageMeta, TodoInput, TodoListResponse, TodoQuery,
        TodoResponse,
    },
    todos::TodoUseCase,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;

/// Lists todos, most recently created first.
///
/// ## Query Parameters:
/// - `page` (optional, default 0): zero-based page index.
/// - `limit` (optional, default 10): page size.
/// - `title` (optional): case-insensitive substring filter on the title.
///
/// ## Responses:
/// - `200 OK`: `{"data": [Todo], "meta": {"page", "limit", "total"}}`, where `total`
///   counts every todo matching the filter, not just this page.
/// - `401 Unauthorized`: missing or invalid token.
#[get("")]
pub async fn list_todos(
    todos: web::Data<TodoUseCase>,
    query: web::Query<TodoQuery>,
) -> Result<impl Responder, AppError> {
    let (page, limit) = (query.page(), query.limit());
    let result = todos.get_all_todos(page, limit, query.title()).await?;

    Ok(HttpResponse::Ok().json(TodoListResponse {
        data: result.items,
        meta: PageMeta {
            page,
            limit,
            total: result.total,
        },
    }))
}

/// Creates a todo.
///
/// ## Request Body:
/// `{"title", "dueDate", "done"}`; `dueDate` is RFC 3339 or `YYYY-MM-DD`,
/// `done` defaults to false.
///
/// ## Responses:
/// - `201 Created`: `{"message", "id"}`.
/// - `400 Bad Request`: malformed body, bad title length or unparseable date.
/// - `401 Unauthorized`: missing or invalid token.
#[post("")]
pub async fn create_todo(
    todos: web::Data<TodoUseCase>,
    user: AuthenticatedUser,
    input: web::Json<TodoInput>,
) -> Result<impl Responder, AppError> {
    input.validate()?;

    let todo = todos
        .create_todo(&input.title, &input.due_date, input.done)
        .await?;
    log::info!("Todo {} created by {}", todo.id, user.username());

    Ok(HttpResponse::Created().json(CreatedResponse {
        message: "Todo item created successfully".to_string(),
        id: todo.id,
    }))
}

/// Fetches one todo.
///
/// ## Responses:
/// - `200 OK`: `{"todo": Todo}`.
/// - `401 Unauthorized`: missing or invalid token.
/// - `404 Not Found`: no todo has this id.
#[get("/{id}")]
pub async fn get_todo(
    todos: web::Data<TodoUseCase>,
    todo_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let todo = todos.get_todo_by_id(todo_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(TodoResponse { todo }))
}

/// Replaces a todo's title, due date and done flag.
///
/// ## Responses:
/// - `200 OK`: `{"message"}`.
/// - `400 Bad Request`: malformed body, bad title length or unparseable date.
/// - `401 Unauthorized`: missing or invalid token.
/// - `404 Not Found`: no todo has this id; nothing is created.
#[put("/{id}")]
pub async fn update_todo(
    todos: web::Data<TodoUseCase>,
    user: AuthenticatedUser,
    todo_id: web::Path<Uuid>,
    input: web::Json<TodoInput>,
) -> Result<impl Responder, AppError> {
    input.validate()?;
    let id = todo_id.into_inner();

    todos
        .update_todo(id, &input.title, &input.due_date, input.done)
        .await?;
    log::info!("Todo {} updated by {}", id, user.username());

    Ok(HttpResponse::Ok().json(MessageResponse::new("Todo item updated successfully")))
}

/// Deletes a todo.
///
/// ## Responses:
/// - `200 OK`: `{"message"}`.
/// - `401 Unauthorized`: missing or invalid token.
/// - `404 Not Found`: no todo has this id.
#[delete("/{id}")]
pub async fn delete_todo(
    todos: web::Data<TodoUseCase>,
    user: AuthenticatedUser,
    todo_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let id = todo_id.into_inner();
    todos.delete_todo(id).await?;
    log::info!("Todo {} deleted by {}", id, user.username());

    Ok(HttpResponse::Ok().json(MessageResponse::new("Todo item deleted successfully")))
}
