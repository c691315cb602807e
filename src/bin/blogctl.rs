//!
//! goalblog CLI binary
//! --------------------
//! Terminal client for the Goal Blog backend, driving the same session,
//! gateway and service layers the console uses. Sessions persist in a
//! JSON state file so a login survives across invocations.

use std::env;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use goalblog::api::{AuthService, CategoriesService, PostQuery, PostsService, StatisticsService};
use goalblog::config::Config;
use goalblog::gateway::{ApiGateway, MediaUploader};
use goalblog::session::SessionStore;
use goalblog::storage::FileBackend;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} login <username> <password> [--api <url>]\n  {program} logout\n  {program} whoami\n  {program} posts [--page <n>] [--search <text>] [--api <url>]\n  {program} post <id> [--api <url>]\n  {program} categories [--api <url>]\n  {program} stats [--api <url>]\n\nFlags:\n  --api <url>   Backend base URL (default: GOALBLOG_API_URL or the production API)\n  -h, --help    Show this help\n\nState:\n  The session (token, user, expiry) lives under GOALBLOG_STATE_DIR (default .goalblog).\n"
    );
}

struct Services {
    session: SessionStore,
    auth: AuthService,
    posts: PostsService,
    categories: CategoriesService,
    stats: StatisticsService,
}

fn build_services(api_override: Option<&str>) -> Result<Services> {
    let mut config = Config::from_env();
    if let Some(url) = api_override {
        config.api_url = url.trim_end_matches('/').to_string();
    }
    let state_dir = env::var("GOALBLOG_STATE_DIR").unwrap_or_else(|_| ".goalblog".to_string());
    let backend = Arc::new(FileBackend::open(&state_dir)?);
    let session = SessionStore::new(backend, &config);
    let gateway = ApiGateway::new(&config);
    let uploader = MediaUploader::new(&config);
    Ok(Services {
        session: session.clone(),
        auth: AuthService::new(gateway.clone(), session.clone()),
        posts: PostsService::new(gateway.clone(), session.clone(), uploader),
        categories: CategoriesService::new(gateway.clone(), session.clone()),
        stats: StatisticsService::new(gateway, session),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Init logging
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();
    fmt().with_env_filter(filter).init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(|s| s.as_str()).unwrap_or("blogctl").to_string();
    if args.len() < 2 || args[1] == "-h" || args[1] == "--help" {
        print_usage(&program);
        return Ok(());
    }

    // Collect flag values; positional args stay in order.
    let mut api: Option<String> = None;
    let mut page: u32 = 1;
    let mut search: Option<String> = None;
    let mut positional: Vec<String> = Vec::new();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--api" => {
                i += 1;
                api = Some(args.get(i).cloned().ok_or_else(|| anyhow!("--api needs a value"))?);
            }
            "--page" => {
                i += 1;
                page = args.get(i).and_then(|s| s.parse().ok()).ok_or_else(|| anyhow!("--page needs a number"))?;
            }
            "--search" => {
                i += 1;
                search = Some(args.get(i).cloned().ok_or_else(|| anyhow!("--search needs a value"))?);
            }
            other => positional.push(other.to_string()),
        }
        i += 1;
    }

    let svc = build_services(api.as_deref())?;
    let command = positional.first().map(|s| s.as_str()).unwrap_or("");
    match command {
        "login" => {
            let user = positional.get(1).ok_or_else(|| anyhow!("login needs <username> <password>"))?;
            let pass = positional.get(2).ok_or_else(|| anyhow!("login needs <username> <password>"))?;
            let profile = svc.auth.login(user, pass).await?;
            info!(target: "blogctl", "logged in as {} ({})", profile.name, profile.role_tag);
            println!("ok: {}", profile.name);
        }
        "logout" => {
            svc.auth.logout()?;
            println!("ok");
        }
        "whoami" => match svc.session.user() {
            Some(u) if svc.session.is_authenticated(None) => {
                println!("{} ({}) role={}", u.name, u.username, u.role_tag);
            }
            _ => println!("not logged in"),
        },
        "posts" => {
            let mut query = PostQuery::page(page, 10);
            query.search = search;
            let (posts, total) = svc.posts.list(&query).await?;
            for p in &posts {
                println!("{:>6}  {:<40}  {:<20}  views={}", p.id, p.title, p.category_name, p.views);
            }
            println!("-- page {} of {} posts", page, total);
        }
        "post" => {
            let id: i64 = positional
                .get(1)
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| anyhow!("post needs a numeric <id>"))?;
            let p = svc.posts.get(id).await?;
            println!("# {} ({})", p.title, p.slug);
            println!("{}", p.content);
        }
        "categories" => {
            for c in svc.categories.list().await? {
                println!("{:>4}  {:<30}  order={}", c.id, c.name, c.order);
            }
        }
        "stats" => {
            let s = svc.stats.fetch().await?;
            println!(
                "posts this month: {} ({:+.1}%)",
                s.growth.posts_this_month,
                s.growth.post_growth_percent()
            );
            println!(
                "views this month: {} ({:+.1}%)",
                s.growth.views_this_month,
                s.growth.view_growth_percent()
            );
            for m in &s.posts_by_month {
                println!("{:>2}/{}  posts={:<5} views={}", m.month, m.year, m.posts, m.views);
            }
        }
        other => {
            eprintln!("unknown command: {}", other);
            print_usage(&program);
        }
    }
    Ok(())
}
