//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. For this reason, any long, non-cpu-bound operation (e.g. I/O,
//! database operations, etc.) must be expressed as futures or asynchronous functions, which get executed concurrently
//! by the worker threads.

use actix_web::{get, web, HttpResponse, Responder};
use cashfree_tools::{new_remote_order_id, normalize_phone, CashfreeApi, CustomerDetails};
use log::*;
use shop_payment_engine::{
    db_types::{NewOrder, RemoteOrderId},
    traits::PaymentGatewayDatabase,
    ReconciliationApi,
};
use spg_common::Rupees;

use crate::{
    data_objects::{CheckoutRequest, CheckoutResponse, OrderStatusResponse},
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Checkout  ----------------------------------------------------
route!(checkout => Post "/checkout" impl PaymentGatewayDatabase);
/// Route handler for the checkout endpoint
///
/// Creates a `Pending` order locally, registers it with the payment gateway and returns the payment session the
/// storefront redirects the customer with. The gateway reference is persisted only once the gateway has accepted
/// the order, and before the session is handed to the storefront, so the reference is resolvable by the time any
/// customer can pay against it.
///
/// If the gateway cannot be reached a 503 is returned. The local order stays `Pending` with no gateway
/// reference attached, so a later checkout attempt can register it afresh.
pub async fn checkout<B: PaymentGatewayDatabase>(
    body: web::Json<CheckoutRequest>,
    api: web::Data<ReconciliationApi<B>>,
    cashfree: web::Data<CashfreeApi>,
) -> Result<HttpResponse, ServerError> {
    let request = body.into_inner();
    let total_price = request
        .total_price
        .parse::<Rupees>()
        .map_err(|e| ServerError::InvalidRequestBody(format!("Invalid total price. {e}")))?;
    debug!("💻️ POST checkout for customer {} ({total_price})", request.customer_id);
    let order = api.create_order(NewOrder::new(request.customer_id.clone(), total_price)).await?;
    let remote_id = RemoteOrderId(new_remote_order_id(order.id));
    let customer = CustomerDetails {
        customer_id: request.customer_id,
        customer_name: request.customer_name,
        customer_email: request.customer_email,
        customer_phone: normalize_phone(request.customer_phone.as_deref()),
    };
    let session = cashfree.create_order(remote_id.as_str(), total_price, customer, None).await.map_err(|e| {
        warn!("💻️ Could not create gateway order for order #{}. It stays pending with no gateway reference. {e}", order.id);
        ServerError::from(e)
    })?;
    api.attach_remote_id(order.id, &remote_id).await?;
    info!("💻️ Checkout for order #{} complete. Gateway reference: {}", order.id, session.remote_order_id);
    let response = CheckoutResponse {
        order_id: order.id,
        remote_order_id: session.remote_order_id,
        payment_session_id: session.payment_session_id,
        payment_link: session.payment_link,
    };
    Ok(HttpResponse::Ok().json(response))
}

//----------------------------------------------   Order status  ----------------------------------------------------
route!(order_status => Get "/order-status/{id}" impl PaymentGatewayDatabase);
pub async fn order_status<B: PaymentGatewayDatabase>(
    path: web::Path<i64>,
    api: web::Data<ReconciliationApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = path.into_inner();
    debug!("💻️ GET order status for #{order_id}");
    let order = api
        .fetch_order(order_id)
        .await?
        .ok_or_else(|| ServerError::NoRecordFound(format!("Order {order_id} does not exist.")))?;
    Ok(HttpResponse::Ok().json(OrderStatusResponse::from(order)))
}

route!(customer_orders => Get "/orders/{customer_id}" impl PaymentGatewayDatabase);
/// All orders for a storefront customer, oldest first. Lets the storefront render an order history without
/// keeping its own copy of payment state.
pub async fn customer_orders<B: PaymentGatewayDatabase>(
    path: web::Path<String>,
    api: web::Data<ReconciliationApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let customer_id = path.into_inner();
    debug!("💻️ GET orders for customer {customer_id}");
    let orders = api.db().fetch_orders_for_customer(&customer_id).await?;
    let response = orders.into_iter().map(OrderStatusResponse::from).collect::<Vec<_>>();
    Ok(HttpResponse::Ok().json(response))
}
