fn main() {
    // 消息类型在 src/proto.rs 中手写，这里只生成服务端和客户端桩代码，不依赖 protoc
    let greeter_service = tonic_build::manual::Service::builder()
        .name("GreeterService")
        .package("greeter")
        .method(
            tonic_build::manual::Method::builder()
                .name("say_hello")
                .route_name("SayHello")
                .input_type("crate::proto::HelloRequest")
                .output_type("crate::proto::HelloResponse")
                .codec_path("tonic::codec::ProstCodec")
                .build(),
        )
        .build();

    tonic_build::manual::Builder::new().compile(&[greeter_service]);
}
