//! OpenAPI 3.0 description of the routes served by [`super::Api`]

use serde_json::{json, Value};

use super::CALLER_ID_HEADER;

fn message_schema() -> Value {
    json!({
        "type": "object",
        "properties": { "message": { "type": "string" } }
    })
}

fn message_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": { "application/json": { "schema": message_schema() } }
    })
}

fn user_profile_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "id": { "type": "string" },
            "username": { "type": "string" },
            "isAdmin": { "type": "boolean" }
        }
    })
}

fn task_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "id": { "type": "string", "description": "Unique identifier for the task" },
            "title": { "type": "string" },
            "description": { "type": "string" },
            "assignedTo": {
                "type": "string",
                "nullable": true,
                "description": "ID of the user assigned to the task"
            }
        }
    })
}

fn credentials_body(with_admin_flag: bool) -> Value {
    let mut properties = json!({
        "username": { "type": "string" },
        "password": { "type": "string" }
    });
    if with_admin_flag {
        properties["isAdmin"] = json!({ "type": "boolean", "default": false });
    }
    json!({
        "required": true,
        "content": {
            "application/json": {
                "schema": { "type": "object", "properties": properties }
            }
        }
    })
}

fn user_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": {
                    "type": "object",
                    "properties": {
                        "message": { "type": "string" },
                        "user": user_profile_schema()
                    }
                }
            }
        }
    })
}

/// Build the API document served at `/api-docs.json`
pub fn document() -> Value {
    json!({
        "openapi": "3.0.0",
        "info": {
            "title": "Task Management API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Users and tasks persisted as JSON documents"
        },
        "tags": [
            { "name": "Auth", "description": "User authentication" },
            { "name": "Tasks", "description": "Task management" }
        ],
        "paths": {
            "/api/auth/register": {
                "post": {
                    "summary": "Register a new user",
                    "tags": ["Auth"],
                    "requestBody": credentials_body(true),
                    "responses": {
                        "201": user_response("User registered successfully"),
                        "400": message_response("Username already exists")
                    }
                }
            },
            "/api/auth/login": {
                "post": {
                    "summary": "Login a user",
                    "tags": ["Auth"],
                    "requestBody": credentials_body(false),
                    "responses": {
                        "200": user_response("Login successful"),
                        "401": message_response("Invalid credentials")
                    }
                }
            },
            "/api/tasks": {
                "get": {
                    "summary": "Get all tasks (Admin only)",
                    "tags": ["Tasks"],
                    "parameters": [{
                        "name": CALLER_ID_HEADER,
                        "in": "header",
                        "required": true,
                        "schema": { "type": "string" },
                        "description": "Identifier of the calling user"
                    }],
                    "responses": {
                        "200": {
                            "description": "List of all tasks",
                            "content": {
                                "application/json": {
                                    "schema": { "type": "array", "items": task_schema() }
                                }
                            }
                        },
                        "403": message_response("Access denied")
                    }
                },
                "post": {
                    "summary": "Create a new task",
                    "tags": ["Tasks"],
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": {
                                    "type": "object",
                                    "properties": {
                                        "title": { "type": "string" },
                                        "description": { "type": "string" }
                                    }
                                }
                            }
                        }
                    },
                    "responses": {
                        "201": {
                            "description": "Task created successfully",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "object",
                                        "properties": {
                                            "message": { "type": "string" },
                                            "task": task_schema()
                                        }
                                    }
                                }
                            }
                        },
                        "400": message_response("Title is required")
                    }
                }
            }
        }
    })
}
