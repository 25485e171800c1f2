mod helpers;
mod routes;
mod ws;
