mod home;
mod records;

use axum::{
	routing::{get, MethodRouter},
	Router,
};

use crate::{
	adapters::repositories::TRepository,
	domain::{comment::Comment, post::Post, Phantom, Record},
	services::response::ServiceResponse,
	state::AppState,
};

/// A record type exposed as a collection plus an item path.
pub trait Resource: Record + Phantom {
	fn repository(state: &AppState) -> &dyn TRepository<Self>;
}

impl Resource for Post {
	fn repository(state: &AppState) -> &dyn TRepository<Self> {
		state.posts.as_ref()
	}
}

impl Resource for Comment {
	fn repository(state: &AppState) -> &dyn TRepository<Self> {
		state.comments.as_ref()
	}
}

fn collection<E: Resource>() -> MethodRouter<AppState>
where
	ServiceResponse: From<E> + From<Vec<E>>,
{
	get(records::list::<E>)
		.post(records::create::<E>)
		.put(records::missing_id)
		.delete(records::missing_id)
		.fallback(records::method_not_allowed)
}

fn item<E: Resource>() -> MethodRouter<AppState>
where
	ServiceResponse: From<E> + From<Vec<E>>,
{
	get(records::fetch::<E>)
		.put(records::update::<E>)
		.delete(records::delete::<E>)
		.fallback(records::method_not_allowed)
}

fn resource<E: Resource>(
	router: Router<AppState>,
	prefix: &str,
) -> Router<AppState>
where
	ServiceResponse: From<E> + From<Vec<E>>,
{
	router
		.route(prefix, collection::<E>())
		.route(&format!("{prefix}/"), collection::<E>())
		.route(&format!("{prefix}/:id"), item::<E>())
		.route(&format!("{prefix}/:id/"), item::<E>())
}

pub fn create_routes(state: AppState) -> Router {
	let router = Router::new().route("/", get(home::index).fallback(records::method_not_allowed));
	let router = resource::<Post>(router, "/posts");
	let router = resource::<Comment>(router, "/comments");
	router.fallback(home::page_not_found).with_state(state)
}
