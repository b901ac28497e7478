pub mod followup_request;
pub mod search_tickets_query;
pub mod ticket_response;
pub mod tickets_route;
