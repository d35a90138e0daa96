#![allow(dead_code)]

pub mod fixtures {
    use serde_json::json;
    use typedroute::schema::Schema;
    use typedroute::spec::RouteSpec;

    pub fn article() -> Schema {
        Schema::object()
            .field("slug", Schema::string().min_length(1))
            .field("title", Schema::string().min_length(1).max_length(120))
            .field("body", Schema::string())
            .optional("tags", Schema::array(Schema::string()).max_items(10))
            .named("Article")
            .example(json!({"slug": "hello", "title": "Hello", "body": "First post"}))
    }

    pub fn problem() -> Schema {
        Schema::object()
            .field("title", Schema::string())
            .optional("detail", Schema::string())
            .named("Problem")
    }

    /// `GET /articles/{slug}` answering 200 or 404
    pub fn get_article() -> RouteSpec {
        RouteSpec::get("/articles/{slug}")
            .summary("Fetch one article")
            .tag("articles")
            .path_params(Schema::object().field("slug", Schema::string()))
            .response(200, "The article", "application/json", article())
            .response(404, "No such article", "application/json", problem())
    }

    /// `GET /articles` with paging and tag filters
    pub fn list_articles() -> RouteSpec {
        RouteSpec::get("/articles")
            .summary("List articles")
            .tag("articles")
            .query(
                Schema::object()
                    .optional(
                        "limit",
                        Schema::integer()
                            .minimum(1.0)
                            .maximum(100.0)
                            .default_value(json!(20)),
                    )
                    .optional("tag", Schema::array(Schema::string())),
            )
            .response(
                200,
                "Matching articles",
                "application/json",
                Schema::object().field("articles", Schema::array(article())),
            )
    }

    /// `POST /articles` taking a JSON or form body
    pub fn create_article() -> RouteSpec {
        let draft = Schema::object()
            .optional("title", Schema::string())
            .field("body", Schema::string().min_length(1));
        RouteSpec::post("/articles")
            .summary("Create an article")
            .tag("articles")
            .headers(Schema::object().field("x-author", Schema::string()))
            .body("application/json", draft.clone())
            .body("application/x-www-form-urlencoded", draft)
            .body_required()
            .response(201, "Created", "application/json", article())
    }

    /// `DELETE /articles/{slug}` with a session cookie
    pub fn delete_article() -> RouteSpec {
        RouteSpec::delete("/articles/{slug}")
            .tag("articles")
            .path_params(Schema::object().field("slug", Schema::string()))
            .cookies(Schema::object().field("session", Schema::string().min_length(8)))
            .response_empty(204, "Deleted")
    }
}

pub mod store {
    use serde::{Deserialize, Serialize};
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Article {
        pub slug: String,
        pub title: String,
        pub body: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pub tags: Vec<String>,
    }

    pub type Store = Arc<Mutex<BTreeMap<String, Article>>>;

    pub fn seeded() -> Store {
        let mut articles = BTreeMap::new();
        for (slug, tags) in [("hello", vec!["intro"]), ("rust-tips", vec!["rust", "tips"])] {
            articles.insert(
                slug.to_string(),
                Article {
                    slug: slug.to_string(),
                    title: slug.replace('-', " "),
                    body: format!("All about {slug}"),
                    tags: tags.into_iter().map(String::from).collect(),
                },
            );
        }
        Arc::new(Mutex::new(articles))
    }
}

pub mod app {
    use super::fixtures;
    use super::store::{Article, Store};
    use serde::Deserialize;
    use serde_json::json;
    use std::sync::Arc;
    use typedroute::config::ValidationConfig;
    use typedroute::registry::{RouteFactory, RuntimeAdapter};
    use typedroute::spec::Location;

    #[derive(Deserialize)]
    struct SlugParams {
        slug: String,
    }

    #[derive(Deserialize)]
    struct ListQuery {
        limit: usize,
        #[serde(default)]
        tag: Vec<String>,
    }

    #[derive(Deserialize)]
    struct Draft {
        title: Option<String>,
        body: String,
    }

    /// Register the four article routes backed by `store`
    pub fn articles<R: RuntimeAdapter>(runtime: R, config: ValidationConfig, store: &Store) -> RouteFactory<R> {
        let mut factory = RouteFactory::new(runtime, config);

        let s = Arc::clone(store);
        factory
            .register(fixtures::get_article(), move |input, res, _next| {
                let params: SlugParams = input.path_params()?;
                let found = s.lock().expect("store").get(&params.slug).cloned();
                match found {
                    Some(article) => Ok(res.ok(&article)?.into()),
                    None => Ok(res
                        .json(404, &json!({"title": "Not Found", "detail": params.slug}))?
                        .into()),
                }
            })
            .expect("get_article");

        let s = Arc::clone(store);
        factory
            .register(fixtures::list_articles(), move |input, res, _next| {
                let query: ListQuery = input.query()?;
                let articles: Vec<Article> = s
                    .lock()
                    .expect("store")
                    .values()
                    .filter(|a| query.tag.is_empty() || a.tags.iter().any(|t| query.tag.contains(t)))
                    .take(query.limit)
                    .cloned()
                    .collect();
                Ok(res.ok(&json!({ "articles": articles }))?.into())
            })
            .expect("list_articles");

        let s = Arc::clone(store);
        factory
            .register(fixtures::create_article(), move |input, res, _next| {
                let draft: Draft = input.body()?;
                let author = input
                    .field(Location::Headers, "x-author")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string();
                let title = draft.title.unwrap_or_else(|| format!("Untitled by {author}"));
                let slug = title.to_ascii_lowercase().replace(' ', "-");
                let article = Article {
                    slug: slug.clone(),
                    title,
                    body: draft.body,
                    tags: Vec::new(),
                };
                s.lock().expect("store").insert(slug.clone(), article.clone());
                Ok(res
                    .json(201, &article)?
                    .with_header("location", format!("/articles/{slug}"))
                    .into())
            })
            .expect("create_article");

        let s = Arc::clone(store);
        factory
            .register(fixtures::delete_article(), move |input, res, next| {
                let params: SlugParams = input.path_params()?;
                if s.lock().expect("store").remove(&params.slug).is_none() {
                    return next.pass();
                }
                Ok(res.empty(204)?.into())
            })
            .expect("delete_article");

        factory
    }
}
