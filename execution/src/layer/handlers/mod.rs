mod click;
mod group;
mod session;
mod trade;
