pub mod models;
pub mod routes;

use async_trait::async_trait;
use axum::Router;
use shelf_db::SharedStore;
use shelf_kernel::{InitCtx, Module};

/// Books module: the `/api/books` collection and its comments.
pub struct BooksModule {
    store: SharedStore,
}

impl BooksModule {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            backend = self.store.backend(),
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.store.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "Every stored book with its comment count",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": {
                                                "$ref": "#/components/schemas/BookSummary"
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/NewBook" }
                                },
                                "application/x-www-form-urlencoded": {
                                    "schema": { "$ref": "#/components/schemas/NewBook" }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "The created book, or \"missing required field title\"",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "oneOf": [
                                                { "$ref": "#/components/schemas/CreatedBook" },
                                                { "$ref": "#/components/schemas/Message" }
                                            ]
                                        }
                                    }
                                }
                            }
                        }
                    },
                    "delete": {
                        "summary": "Delete every book",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "Always \"complete delete successful\"",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Message" }
                                    }
                                }
                            }
                        }
                    }
                },
                "/{id}": {
                    "parameters": [
                        {
                            "name": "id",
                            "in": "path",
                            "required": true,
                            "schema": { "type": "string" }
                        }
                    ],
                    "get": {
                        "summary": "Get a book with its comments",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "The book, or \"no book exists\"",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "oneOf": [
                                                { "$ref": "#/components/schemas/BookDetail" },
                                                { "$ref": "#/components/schemas/Message" }
                                            ]
                                        }
                                    }
                                }
                            }
                        }
                    },
                    "post": {
                        "summary": "Append a comment to a book",
                        "tags": ["Books"],
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/NewComment" }
                                },
                                "application/x-www-form-urlencoded": {
                                    "schema": { "$ref": "#/components/schemas/NewComment" }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "The updated book, \"missing required field comment\" or \"no book exists\"",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "oneOf": [
                                                { "$ref": "#/components/schemas/BookDetail" },
                                                { "$ref": "#/components/schemas/Message" }
                                            ]
                                        }
                                    }
                                }
                            }
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "\"delete successful\" or \"no book exists\"",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Message" }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "BookSummary": {
                        "type": "object",
                        "properties": {
                            "_id": { "type": "string" },
                            "title": { "type": "string" },
                            "commentcount": { "type": "integer", "minimum": 0 }
                        },
                        "required": ["_id", "title", "commentcount"]
                    },
                    "CreatedBook": {
                        "type": "object",
                        "properties": {
                            "_id": { "type": "string" },
                            "title": { "type": "string" }
                        },
                        "required": ["_id", "title"]
                    },
                    "BookDetail": {
                        "type": "object",
                        "properties": {
                            "_id": { "type": "string" },
                            "title": { "type": "string" },
                            "comments": {
                                "type": "array",
                                "items": { "type": "string" }
                            }
                        },
                        "required": ["_id", "title", "comments"]
                    },
                    "NewBook": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" }
                        }
                    },
                    "NewComment": {
                        "type": "object",
                        "properties": {
                            "comment": { "type": "string" }
                        }
                    },
                    "Message": {
                        "type": "string",
                        "description": "Outcome message; failures are reported this way with status 200"
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(store: SharedStore) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new(store))
}
