use anyhow::Result;
use stout::{hyper::Response, Body, Context, Router};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

async fn index(ctx: Context) -> Result<Response<Body>> {
	ctx.html("<h1>stout</h1>")
}

async fn detail(ctx: Context) -> Result<Response<Body>> {
	info!(
		id = ctx.param("id"),
		name = ctx.param("name"),
		user_agent = ctx.user_agent(),
		"detail"
	);
	ctx.text(format!(
		"post {} by {}",
		ctx.param("id").unwrap_or_default(),
		ctx.param("name").unwrap_or("anonymous")
	))
}

async fn login(ctx: Context) -> Result<Response<Body>> {
	if ctx.param("user").is_none() {
		return ctx.redirect("/");
	}

	ctx.json(&serde_json::json!({ "code": 1000, "msg": "logged in" }))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| "stout=debug,router=debug".into()),
		)
		.with(tracing_subscriber::fmt::layer())
		.init();

	Router::builder()
		.get("/", index)
		.get("/posts/:id/:name", detail)
		.get("/posts/:id", detail)
		.post("/login", login)
		.static_file("/Cargo.toml", "Cargo.toml")
		.build()
		.run(([127, 0, 0, 1], 3000))
		.await?;

	Ok(())
}
