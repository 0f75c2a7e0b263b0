mod form;
mod health_check;
mod helpers;
