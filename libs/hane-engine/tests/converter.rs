//! Integration tests for the conversion engine over derived entities.

use std::cell::RefCell;
use std::rc::Rc;

use hane_api::{fields, ConvertError, Entity, Fields, Includes, RequestParams, Shape, Transformer};
use hane_engine::Converter;
use serde_json::{json, Value};

#[derive(Debug, Clone, Entity)]
struct User {
    id: u64,
    name: String,
    #[entity(skip)]
    password_hash: String,
}

#[derive(Debug, Clone, Entity)]
struct Comment {
    id: u64,
    body: String,
    #[entity(skip)]
    author: User,
}

#[derive(Debug, Clone, Entity)]
struct Post {
    id: u64,
    slug: String,
    title: String,
    category: Option<String>,
    #[entity(skip)]
    author: User,
    #[entity(skip)]
    comments: Vec<Comment>,
}

struct UserTransformer;

impl Transformer for UserTransformer {
    type Entity = User;

    fn to_fields(&self, user: &User) -> Fields {
        fields! { "id" => user.id, "name" => user.name }
    }
}

struct CommentTransformer;

impl Transformer for CommentTransformer {
    type Entity = Comment;

    fn to_fields(&self, comment: &Comment) -> Fields {
        fields! { "id" => comment.id, "body" => comment.body }
    }

    fn includes(&self) -> Vec<&str> {
        vec!["author"]
    }

    fn resolvers(&self) -> Includes<'_, Comment> {
        Includes::new().with("author", |comment: &Comment| {
            Box::new(Converter::entity(UserTransformer, comment.author.clone()).only(["name"]))
        })
    }
}

struct PostTransformer;

impl Transformer for PostTransformer {
    type Entity = Post;

    fn to_fields(&self, post: &Post) -> Fields {
        fields! { "id" => post.id, "title" => post.title, "slug" => post.slug }
    }

    fn includes(&self) -> Vec<&str> {
        vec!["author", "comments", "latestComment", "reviewer"]
    }

    fn resolvers(&self) -> Includes<'_, Post> {
        // "reviewer" is declared but deliberately has no resolver.
        Includes::new()
            .with("author", |post: &Post| {
                Box::new(Converter::entity(UserTransformer, post.author.clone()))
            })
            .with("comments", |post: &Post| {
                Box::new(Converter::collection(CommentTransformer, post.comments.clone()))
            })
            .with("latestComment", |post: &Post| match post.comments.last() {
                Some(comment) => Box::new(Converter::entity(CommentTransformer, comment.clone())),
                None => Box::new(Converter::raw(CommentTransformer, Value::Null)),
            })
    }
}

fn user(id: u64, name: &str) -> User {
    User {
        id,
        name: name.to_string(),
        password_hash: "secret".to_string(),
    }
}

fn post(id: u64, slug: &str) -> Post {
    Post {
        id,
        slug: slug.to_string(),
        title: format!("Post {id}"),
        category: Some("news".to_string()),
        author: user(10 + id, "Ann"),
        comments: vec![
            Comment {
                id: 100 + id,
                body: "first".to_string(),
                author: user(20, "Bob"),
            },
            Comment {
                id: 200 + id,
                body: "second".to_string(),
                author: user(21, "Cid"),
            },
        ],
    }
}

fn query(q: &str) -> RequestParams {
    RequestParams::from_query(q)
}

// === Entity ===

#[test]
fn entity_without_rules_equals_base_fields() {
    let out = Converter::entity(PostTransformer, post(1, "hello")).convert(&RequestParams::new());
    assert_eq!(out, Ok(json!({ "id": 1, "title": "Post 1", "slug": "hello" })));
}

#[test]
fn whitelist_is_intersection_with_base_fields() {
    let out = Converter::entity(PostTransformer, post(1, "hello"))
        .only(["slug", "id", "views"])
        .convert(&RequestParams::new())
        .expect("converts");

    let keys: Vec<&str> = out.as_object().expect("mapping").keys().map(String::as_str).collect();
    assert_eq!(keys, ["id", "slug"]);
}

#[test]
fn whitelist_does_not_remove_includes() {
    let out = Converter::entity(PostTransformer, post(1, "hello"))
        .only(["id"])
        .convert(&query("include=author"));
    assert_eq!(out, Ok(json!({ "id": 1, "author": { "id": 11, "name": "Ann" } })));
}

// === Includes ===

#[test]
fn undeclared_includes_are_ignored() {
    let out = Converter::entity(PostTransformer, post(1, "hello"))
        .only(["id"])
        .convert(&query("include=author,tags"));
    assert_eq!(out, Ok(json!({ "id": 1, "author": { "id": 11, "name": "Ann" } })));
}

#[test]
fn include_key_is_snake_cased() {
    let out = Converter::entity(PostTransformer, post(1, "hello"))
        .only(["id"])
        .convert(&query("include=latestComment"));
    assert_eq!(out, Ok(json!({ "id": 1, "latest_comment": { "id": 201, "body": "second" } })));
}

#[test]
fn include_names_are_case_sensitive() {
    let out = Converter::entity(PostTransformer, post(1, "hello"))
        .only(["id"])
        .convert(&query("include=Author,latest_comment"));
    assert_eq!(out, Ok(json!({ "id": 1 })));
}

#[test]
fn nested_converters_see_the_same_request() {
    let out = Converter::entity(PostTransformer, post(1, "hello"))
        .only(["id"])
        .convert(&query("include=comments,author"))
        .expect("converts");

    insta::assert_json_snapshot!(out, @r###"
    {
      "id": 1,
      "comments": [
        {
          "id": 101,
          "body": "first",
          "author": {
            "name": "Bob"
          }
        },
        {
          "id": 201,
          "body": "second",
          "author": {
            "name": "Cid"
          }
        }
      ],
      "author": {
        "id": 11,
        "name": "Ann"
      }
    }
    "###);
}

#[test]
fn declared_include_without_resolver_fails() {
    let out = Converter::entity(PostTransformer, post(1, "hello"))
        .wrap("data")
        .convert(&query("include=author,reviewer"));

    match out {
        Err(ConvertError::ResolverNotFound { include, converter }) => {
            assert_eq!(include, "reviewer");
            assert!(converter.ends_with("PostTransformer"), "{converter}");
        }
        other => panic!("expected ResolverNotFound, got {other:?}"),
    }
}

#[test]
fn missing_resolver_in_nested_converter_propagates() {
    struct Strict;

    impl Transformer for Strict {
        type Entity = Comment;

        fn to_fields(&self, comment: &Comment) -> Fields {
            fields! { "id" => comment.id }
        }

        fn includes(&self) -> Vec<&str> {
            vec!["author"]
        }
    }

    struct Outer;

    impl Transformer for Outer {
        type Entity = Post;

        fn to_fields(&self, post: &Post) -> Fields {
            fields! { "id" => post.id }
        }

        fn includes(&self) -> Vec<&str> {
            vec!["comments"]
        }

        fn resolvers(&self) -> Includes<'_, Post> {
            Includes::new().with("comments", |post: &Post| {
                Box::new(Converter::collection(Strict, post.comments.clone()))
            })
        }
    }

    let out = Converter::entity(Outer, post(1, "hello")).convert(&query("include=comments,author"));
    assert!(matches!(out, Err(ConvertError::ResolverNotFound { include, .. }) if include == "author"));
}

// === Collections ===

#[test]
fn collection_keeps_order_and_length() {
    let posts = vec![post(3, "c"), post(1, "a"), post(2, "b")];
    let out = Converter::collection(PostTransformer, posts)
        .only(["id"])
        .convert(&RequestParams::new());
    assert_eq!(out, Ok(json!([{ "id": 3 }, { "id": 1 }, { "id": 2 }])));
}

#[test]
fn empty_collection_is_empty_sequence() {
    let out = Converter::collection(PostTransformer, Vec::new()).convert(&query("include=reviewer"));
    assert_eq!(out, Ok(json!([])));
}

#[test]
fn collection_rekeyed_by_attribute() {
    let posts = vec![post(1, "first"), post(2, "second")];
    let out = Converter::collection(PostTransformer, posts)
        .only(["id"])
        .convert(&query("collection_key=slug"))
        .expect("converts");

    assert_eq!(out, json!({ "first": { "id": 1 }, "second": { "id": 2 } }));
    let keys: Vec<&str> = out.as_object().expect("mapping").keys().map(String::as_str).collect();
    assert_eq!(keys, ["first", "second"]);
}

#[test]
fn rekey_reads_attributes_not_output_fields() {
    // `category` is an entity attribute but not part of the post's fields.
    let out = Converter::collection(PostTransformer, vec![post(1, "a")])
        .only(["id"])
        .convert(&query("collection_key=category"));
    assert_eq!(out, Ok(json!({ "news": { "id": 1 } })));
}

#[test]
fn rekey_by_number_uses_display_form() {
    let out = Converter::collection(PostTransformer, vec![post(7, "a")])
        .only(["slug"])
        .convert(&query("collection_key=id"));
    assert_eq!(out, Ok(json!({ "7": { "slug": "a" } })));
}

#[test]
fn rekey_duplicate_keeps_first_position_last_value() {
    let mut second = post(2, "b");
    second.category = Some("tips".to_string());
    let third = post(3, "c");

    let out = Converter::collection(PostTransformer, vec![post(1, "a"), second, third])
        .only(["id"])
        .convert(&query("collection_key=category"))
        .expect("converts");

    assert_eq!(out, json!({ "news": { "id": 3 }, "tips": { "id": 2 } }));
    let keys: Vec<&str> = out.as_object().expect("mapping").keys().map(String::as_str).collect();
    assert_eq!(keys, ["news", "tips"]);
}

#[test]
fn rekey_fails_on_null_key() {
    let mut second = post(2, "b");
    second.category = None;

    let out = Converter::collection(PostTransformer, vec![post(1, "a"), second])
        .convert(&query("collection_key=category"));
    assert_eq!(out, Err(ConvertError::key_field_missing("category", 1)));
}

#[test]
fn rekey_fails_on_empty_key() {
    let out = Converter::collection(PostTransformer, vec![post(1, "")])
        .convert(&query("collection_key=slug"));
    assert_eq!(out, Err(ConvertError::key_field_missing("slug", 0)));
}

#[test]
fn rekey_fails_on_unknown_or_skipped_attribute() {
    let missing = Converter::collection(PostTransformer, vec![post(1, "a")])
        .convert(&query("collection_key=views"));
    assert_eq!(missing, Err(ConvertError::key_field_missing("views", 0)));

    let skipped = Converter::collection(PostTransformer, vec![post(1, "a")])
        .convert(&query("collection_key=author"));
    assert_eq!(skipped, Err(ConvertError::key_field_missing("author", 0)));
}

#[test]
fn rekey_ignored_for_single_entity() {
    let out = Converter::entity(PostTransformer, post(1, "a"))
        .only(["id"])
        .convert(&query("collection_key=views"));
    assert_eq!(out, Ok(json!({ "id": 1 })));
}

// === Envelope ===

#[test]
fn envelope_with_attachments() {
    let bare = Converter::entity(PostTransformer, post(1, "a"))
        .convert(&RequestParams::new())
        .expect("converts");

    let wrapped = Converter::entity(PostTransformer, post(1, "a"))
        .wrap("data")
        .attach(fields! { "a" => 1 })
        .convert(&RequestParams::new())
        .expect("converts");

    assert_eq!(wrapped, json!({ "data": bare, "a": 1 }));
    let keys: Vec<&str> = wrapped.as_object().expect("mapping").keys().map(String::as_str).collect();
    assert_eq!(keys, ["data", "a"]);
}

#[test]
fn envelope_wraps_rekeyed_collection() {
    let out = Converter::collection(PostTransformer, vec![post(1, "a")])
        .only(["id"])
        .wrap("posts")
        .attach(fields! { "count" => 1 })
        .convert(&query("collection_key=slug"));
    assert_eq!(out, Ok(json!({ "posts": { "a": { "id": 1 } }, "count": 1 })));
}

// === Callback ===

#[test]
fn callback_sees_final_result_and_shape() {
    let seen: Rc<RefCell<Vec<(Value, Shape)>>> = Rc::default();
    let sink = Rc::clone(&seen);

    let out = Converter::collection(PostTransformer, vec![post(1, "a")])
        .only(["id"])
        .wrap("data")
        .with_callback(move |result, shape| sink.borrow_mut().push((result.clone(), shape)))
        .convert(&RequestParams::new())
        .expect("converts");

    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0], (out, Shape::Collection));
}

#[test]
fn callback_not_called_on_failure() {
    let called = Rc::new(RefCell::new(false));
    let flag = Rc::clone(&called);

    let out = Converter::entity(PostTransformer, post(1, "a"))
        .with_callback(move |_, _| *flag.borrow_mut() = true)
        .convert(&query("include=reviewer"));

    assert!(out.is_err());
    assert!(!*called.borrow());
}

// === Properties ===

#[test]
fn fresh_converters_agree() {
    // Posts and comments both carry `id`, so the key holds at every level.
    let params = query("include=comments,latestComment&collection_key=id");
    let posts = vec![post(1, "a"), post(2, "b")];

    let first = Converter::collection(PostTransformer, posts.clone())
        .convert(&params)
        .expect("converts");
    let second = Converter::collection(PostTransformer, posts)
        .convert(&params)
        .expect("converts");

    assert_eq!(first, second);
    assert_eq!(first["1"]["comments"]["101"], json!({ "id": 101, "body": "first" }));
    assert_eq!(first["2"]["latest_comment"], json!({ "id": 202, "body": "second" }));
}

#[test]
fn collection_key_applies_to_nested_collections() {
    // Comments have no `slug`, and the nested converter sees the same request.
    let out = Converter::collection(PostTransformer, vec![post(1, "a")])
        .convert(&query("include=comments&collection_key=slug"));
    assert_eq!(out, Err(ConvertError::key_field_missing("slug", 0)));

    let without_include = Converter::collection(PostTransformer, vec![post(1, "a")])
        .only(["id"])
        .convert(&query("collection_key=slug"));
    assert_eq!(without_include, Ok(json!({ "a": { "id": 1 } })));
}

#[test]
fn derived_entity_attributes() {
    let user = user(5, "Dee");
    assert_eq!(user.attribute("name"), Some(json!("Dee")));
    assert_eq!(user.attribute("password_hash"), None);
    assert_eq!(Value::Object(user.attributes()), json!({ "id": 5, "name": "Dee" }));

    let post = post(1, "a");
    let keys: Vec<String> = post.attributes().keys().cloned().collect();
    assert_eq!(keys, ["id", "slug", "title", "category"]);
}

#[test]
fn unserializable_field_is_null_and_cannot_key_a_collection() {
    use std::collections::HashMap;

    #[derive(Debug, Clone, Entity)]
    struct Grid {
        id: u64,
        // Tuple keys are not valid JSON object keys.
        cells: HashMap<(u32, u32), u32>,
    }

    struct GridTransformer;

    impl Transformer for GridTransformer {
        type Entity = Grid;

        fn to_fields(&self, grid: &Grid) -> Fields {
            fields! { "id" => grid.id }
        }
    }

    let grid = Grid {
        id: 3,
        cells: HashMap::from([((0, 0), 1)]),
    };
    assert_eq!(grid.attribute("cells"), Some(Value::Null));
    assert_eq!(grid.attribute("rows"), None);
    assert_eq!(Value::Object(grid.attributes()), json!({ "id": 3, "cells": null }));

    let out = Converter::collection(GridTransformer, vec![grid]).convert(&query("collection_key=cells"));
    assert_eq!(out, Err(ConvertError::key_field_missing("cells", 0)));
}
